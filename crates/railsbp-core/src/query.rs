//! Node query layer.
//!
//! [`NodeRef`] is either a node or the Null Object ([`NodeRef::Absent`]).
//! Every projection is total: asked of a node outside its domain it answers
//! `Absent`, an empty `Vec`, an empty string or `None`. That lets checks chain
//! projections without presence tests:
//!
//! ```ignore
//! let name = node.message().render_text();
//! let owner = node.subject().subject().render_text();
//! ```
//!
//! The kind→slot mapping follows Ripper's s-expression shape; see the table in
//! the crate documentation.

use crate::kind::Kind;
use crate::node::{Literal, Slot, SyntaxNode};

/// Boolean operators flattened by [`NodeRef::all_conditions`].
const CONDITION_OPERATORS: &[&str] = &["&&", "||", "and", "or"];

/// A node, or the Null Object standing in for "no node".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum NodeRef<'a> {
    /// A present node.
    Present(&'a SyntaxNode),
    /// The Null Object.
    #[default]
    Absent,
}

impl<'a> From<&'a SyntaxNode> for NodeRef<'a> {
    fn from(node: &'a SyntaxNode) -> Self {
        Self::Present(node)
    }
}

impl<'a> From<Option<&'a SyntaxNode>> for NodeRef<'a> {
    fn from(node: Option<&'a SyntaxNode>) -> Self {
        node.map_or(Self::Absent, Self::Present)
    }
}

impl<'a> NodeRef<'a> {
    /// Returns the underlying node.
    #[must_use]
    pub fn get(self) -> Option<&'a SyntaxNode> {
        match self {
            Self::Present(node) => Some(node),
            Self::Absent => None,
        }
    }

    /// Returns true for the Null Object.
    #[must_use]
    pub fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns true for a present node.
    #[must_use]
    pub fn is_present(self) -> bool {
        !self.is_absent()
    }

    /// Returns the kind tag, `None` for the Null Object.
    #[must_use]
    pub fn kind(self) -> Option<&'a Kind> {
        self.get().map(SyntaxNode::kind)
    }

    /// Returns true if the node has the given kind.
    #[must_use]
    pub fn is(self, kind: &Kind) -> bool {
        self.kind() == Some(kind)
    }

    /// Returns true if the node has any of the given kinds.
    #[must_use]
    pub fn is_any(self, kinds: &[Kind]) -> bool {
        self.kind().is_some_and(|k| kinds.contains(k))
    }

    /// Number of child slots (0 for the Null Object).
    #[must_use]
    pub fn len(self) -> usize {
        self.get().map_or(0, |node| node.slots().len())
    }

    /// True when there are no child slots.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns the node in slot `index`, or the Null Object.
    #[must_use]
    pub fn slot(self, index: usize) -> NodeRef<'a> {
        self.get()
            .and_then(|node| node.slots().get(index))
            .and_then(Slot::as_node)
            .into()
    }

    /// Returns the node in the last slot, or the Null Object.
    #[must_use]
    pub fn last_slot(self) -> NodeRef<'a> {
        self.get()
            .and_then(|node| node.slots().last())
            .and_then(Slot::as_node)
            .into()
    }

    /// Returns the primitive in slot `index`.
    #[must_use]
    pub fn literal(self, index: usize) -> Option<&'a Literal> {
        match self.get()?.slots().get(index)? {
            Slot::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the token text for scanner tokens.
    #[must_use]
    pub fn token_text(self) -> Option<&'a str> {
        self.get().and_then(SyntaxNode::token_text)
    }

    /// Direct structural children, skipping primitive and absent slots.
    #[must_use]
    pub fn children(self) -> Vec<NodeRef<'a>> {
        self.get().map_or_else(Vec::new, |node| {
            node.slots()
                .iter()
                .filter_map(Slot::as_node)
                .map(NodeRef::Present)
                .collect()
        })
    }

    /// Iterates over every descendant in pre-order, excluding `self`.
    #[must_use]
    pub fn descendants(self) -> Descendants<'a> {
        let mut stack = self.children();
        stack.reverse();
        Descendants { stack }
    }

    /// Calls `visit` for every descendant in pre-order.
    pub fn walk(self, mut visit: impl FnMut(NodeRef<'a>)) {
        for node in self.descendants() {
            visit(node);
        }
    }

    /// Returns the source line, derived from children where the node has none.
    #[must_use]
    pub fn line(self) -> Option<usize> {
        let node = self.get()?;
        if let Some(line) = node.own_line() {
            return Some(line);
        }
        match node.kind() {
            Kind::Array => self
                .array_values()
                .into_iter()
                .find_map(NodeRef::line)
                .or_else(|| self.first_child().line()),
            kind if takes_first_child_line(kind) => self.first_child().line(),
            _ => self
                .children()
                .into_iter()
                .rev()
                .find_map(NodeRef::line),
        }
    }

    fn first_child(self) -> NodeRef<'a> {
        self.children().into_iter().next().unwrap_or_default()
    }

    /// Tests a node against every predicate of `pattern`.
    #[must_use]
    pub fn matches(self, pattern: &Pattern) -> bool {
        let Some(kind) = self.kind() else {
            return false;
        };
        if !pattern.kinds.is_empty() && !pattern.kinds.contains(kind) {
            return false;
        }
        if !pattern.subjects.is_empty()
            && !pattern.subjects.contains(&self.subject().render_text())
        {
            return false;
        }
        if !pattern.messages.is_empty()
            && !pattern.messages.contains(&self.message().render_text())
        {
            return false;
        }
        if !pattern.texts.is_empty() && !pattern.texts.contains(&self.render_text()) {
            return false;
        }
        true
    }

    /// Every descendant matching `pattern`, in pre-order.
    #[must_use]
    pub fn find_all(self, pattern: &Pattern) -> Vec<NodeRef<'a>> {
        self.descendants().filter(|n| n.matches(pattern)).collect()
    }

    /// First descendant matching `pattern`, or the Null Object.
    #[must_use]
    pub fn find_first(self, pattern: &Pattern) -> NodeRef<'a> {
        self.descendants()
            .find(|n| n.matches(pattern))
            .unwrap_or_default()
    }

    /// Number of descendants matching `pattern`.
    #[must_use]
    pub fn count_matches(self, pattern: &Pattern) -> usize {
        self.descendants().filter(|n| n.matches(pattern)).count()
    }

    /// Receiver of a call, assignment target owner or binary left operand.
    #[must_use]
    pub fn subject(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Assign | Kind::Field | Kind::Call | Kind::Binary | Kind::CommandCall) => {
                self.slot(0)
            }
            Some(Kind::MethodAddArg | Kind::MethodAddBlock) => self.slot(0).subject(),
            _ => NodeRef::Absent,
        }
    }

    /// Method name of a call. Binary operators are read with [`NodeRef::operator`].
    #[must_use]
    pub fn message(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Command | Kind::Fcall) => self.slot(0),
            Some(Kind::Binary) => self.slot(1),
            Some(Kind::Call | Kind::CommandCall | Kind::Field) => self.slot(2),
            Some(Kind::MethodAddArg | Kind::MethodAddBlock) => self.slot(0).message(),
            _ => NodeRef::Absent,
        }
    }

    /// Operator of a binary or unary expression.
    #[must_use]
    pub fn operator(self) -> Option<&'a str> {
        let index = match self.kind()? {
            Kind::Binary => 1,
            Kind::Unary => 0,
            _ => return None,
        };
        match self.literal(index) {
            Some(Literal::Str(op)) => Some(op),
            _ => self.slot(index).token_text(),
        }
    }

    /// Argument node of a call (an argument list, `arg_paren` or array).
    #[must_use]
    pub fn arguments(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Command) => self.slot(1),
            Some(Kind::CommandCall) => self.slot(3),
            Some(Kind::MethodAddArg) => self.slot(1),
            Some(Kind::MethodAddBlock) => self.slot(0).arguments(),
            Some(Kind::ArgParen) => self.slot(0),
            Some(Kind::Array) => self,
            _ => NodeRef::Absent,
        }
    }

    /// Right operand of a binary expression.
    #[must_use]
    pub fn argument(self) -> NodeRef<'a> {
        if self.is(&Kind::Binary) {
            self.slot(2)
        } else {
            NodeRef::Absent
        }
    }

    /// Flattens an argument node into its argument expressions.
    ///
    /// Accepts what [`NodeRef::arguments`] returns: `args_add_block`, a bare
    /// list, `arg_paren`, `args_add_star` or an array literal.
    #[must_use]
    pub fn argument_values(self) -> Vec<NodeRef<'a>> {
        match self.kind() {
            Some(Kind::ArgsAddBlock) => self.slot(0).argument_values(),
            Some(Kind::List) => self.children(),
            Some(Kind::ArgParen) => self.slot(0).argument_values(),
            Some(Kind::ArgsAddStar) => {
                let mut values = self.slot(0).argument_values();
                values.extend(self.children().into_iter().skip(1));
                values
            }
            Some(Kind::Array) => self.array_values(),
            _ => Vec::new(),
        }
    }

    /// Shorthand for `self.arguments().argument_values()`.
    #[must_use]
    pub fn call_arguments(self) -> Vec<NodeRef<'a>> {
        self.arguments().argument_values()
    }

    /// Assignment target.
    #[must_use]
    pub fn left_value(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Assign | Kind::Opassign) => self.slot(0),
            _ => NodeRef::Absent,
        }
    }

    /// Assigned value.
    #[must_use]
    pub fn right_value(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Assign | Kind::Opassign) => self.last_slot(),
            _ => NodeRef::Absent,
        }
    }

    /// Condition of a conditional or loop.
    #[must_use]
    pub fn conditional(self) -> NodeRef<'a> {
        match self.kind() {
            Some(
                Kind::If
                | Kind::Unless
                | Kind::Elsif
                | Kind::IfMod
                | Kind::UnlessMod
                | Kind::Ifop
                | Kind::While
                | Kind::Until,
            ) => self.slot(0),
            _ => NodeRef::Absent,
        }
    }

    /// Flattens `a && b || c` into `[a, b, c]`; any other node yields itself.
    #[must_use]
    pub fn all_conditions(self) -> Vec<NodeRef<'a>> {
        if !self.is_condition_combinator() {
            return if self.is_present() { vec![self] } else { Vec::new() };
        }
        let mut nodes = Vec::new();
        for operand in [self.slot(0), self.argument()] {
            if operand.is_condition_combinator() {
                nodes.extend(operand.all_conditions());
            } else {
                nodes.push(operand);
            }
        }
        nodes
    }

    fn is_condition_combinator(self) -> bool {
        self.is(&Kind::Binary)
            && self
                .operator()
                .is_some_and(|op| CONDITION_OPERATORS.contains(&op))
    }

    /// Name of a class definition.
    #[must_use]
    pub fn class_name(self) -> NodeRef<'a> {
        if self.is(&Kind::Class) {
            self.slot(0)
        } else {
            NodeRef::Absent
        }
    }

    /// Superclass expression of a class definition.
    #[must_use]
    pub fn base_class(self) -> NodeRef<'a> {
        if self.is(&Kind::Class) {
            self.slot(1)
        } else {
            NodeRef::Absent
        }
    }

    /// Name of a module definition.
    #[must_use]
    pub fn module_name(self) -> NodeRef<'a> {
        if self.is(&Kind::Module) {
            self.slot(0)
        } else {
            NodeRef::Absent
        }
    }

    /// Name token of a method definition.
    #[must_use]
    pub fn method_name(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Def) => self.slot(0),
            Some(Kind::Defs) => self.slot(2),
            _ => NodeRef::Absent,
        }
    }

    /// New name of an `alias`.
    #[must_use]
    pub fn new_method(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Alias | Kind::VarAlias) => self.slot(0),
            _ => NodeRef::Absent,
        }
    }

    /// Old name of an `alias`.
    #[must_use]
    pub fn old_method(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Alias | Kind::VarAlias) => self.slot(1),
            _ => NodeRef::Absent,
        }
    }

    /// Body of a definition, conditional, loop or block.
    #[must_use]
    pub fn body(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::Class | Kind::Def) => self.slot(2),
            Some(
                Kind::Module
                | Kind::If
                | Kind::Unless
                | Kind::Elsif
                | Kind::IfMod
                | Kind::UnlessMod
                | Kind::Ifop
                | Kind::While
                | Kind::Until
                | Kind::DoBlock
                | Kind::BraceBlock,
            ) => self.slot(1),
            Some(Kind::Defs) => self.slot(4),
            Some(Kind::Else) => self.slot(0),
            _ => NodeRef::Absent,
        }
    }

    /// Block attached to a call.
    #[must_use]
    pub fn block(self) -> NodeRef<'a> {
        match self.kind() {
            Some(Kind::MethodAddBlock) => self.slot(1),
            Some(Kind::Command | Kind::CommandCall) => {
                let last = self.last_slot();
                if last.is_any(&[Kind::DoBlock, Kind::BraceBlock]) {
                    last
                } else {
                    NodeRef::Absent
                }
            }
            _ => NodeRef::Absent,
        }
    }

    /// Statements of a body, skipping empty statements.
    #[must_use]
    pub fn statements(self) -> Vec<NodeRef<'a>> {
        let stmts = match self.kind() {
            Some(Kind::Program | Kind::Bodystmt) => self.slot(0).children(),
            Some(Kind::List) => self.children(),
            Some(Kind::DoBlock | Kind::BraceBlock) => {
                let body = self.body();
                if body.is(&Kind::List) {
                    body.children()
                } else {
                    body.statements()
                }
            }
            Some(
                Kind::Class
                | Kind::Module
                | Kind::Def
                | Kind::Defs
                | Kind::If
                | Kind::Unless
                | Kind::Elsif
                | Kind::Else
                | Kind::While
                | Kind::Until,
            ) => self.body().statements(),
            _ => Vec::new(),
        };
        stmts
            .into_iter()
            .filter(|stmt| !stmt.is(&Kind::VoidStmt))
            .collect()
    }

    fn hash_pairs(self) -> Vec<NodeRef<'a>> {
        let list = match self.kind() {
            Some(Kind::BareAssocHash) => self.slot(0),
            Some(Kind::Hash) => self.slot(0).slot(0),
            _ => NodeRef::Absent,
        };
        list.children()
            .into_iter()
            .filter(|pair| pair.is(&Kind::AssocNew))
            .collect()
    }

    /// Value stored under `key` in a hash literal or keyword arguments.
    #[must_use]
    pub fn hash_value(self, key: &str) -> NodeRef<'a> {
        self.hash_pairs()
            .into_iter()
            .find(|pair| pair.slot(0).render_text() == key)
            .map_or(NodeRef::Absent, |pair| pair.slot(1))
    }

    /// Rendered keys of a hash literal or keyword arguments.
    #[must_use]
    pub fn hash_keys(self) -> Vec<String> {
        self.hash_pairs()
            .into_iter()
            .map(|pair| pair.slot(0).render_text())
            .collect()
    }

    /// Values of a hash literal or keyword arguments.
    #[must_use]
    pub fn hash_values(self) -> Vec<NodeRef<'a>> {
        self.hash_pairs()
            .into_iter()
            .map(|pair| pair.slot(1))
            .collect()
    }

    /// Number of pairs in a hash literal or keyword arguments.
    #[must_use]
    pub fn hash_size(self) -> usize {
        self.hash_pairs().len()
    }

    /// Elements of an array literal, including `%w`/`%i` word lists.
    #[must_use]
    pub fn array_values(self) -> Vec<NodeRef<'a>> {
        if !self.is(&Kind::Array) {
            return Vec::new();
        }
        let elements = self.slot(0);
        match elements.kind() {
            Some(Kind::List) => elements.children(),
            Some(Kind::ArgsAddStar | Kind::ArgsAddBlock) => elements.argument_values(),
            _ => Vec::new(),
        }
    }

    /// Number of elements of an array literal.
    #[must_use]
    pub fn array_size(self) -> usize {
        self.array_values().len()
    }

    /// Renders a symbol, string or array literal as a list of strings.
    ///
    /// `[:show, :index]` gives `["show", "index"]`, `:show` gives `["show"]`.
    #[must_use]
    pub fn string_list(self) -> Vec<String> {
        if self.is(&Kind::Array) {
            self.array_values()
                .into_iter()
                .map(NodeRef::render_text)
                .collect()
        } else if self.is_present() {
            vec![self.render_text()]
        } else {
            Vec::new()
        }
    }

    /// Best-effort string form of a node.
    ///
    /// Literals unwrap to their content, qualified constants render as
    /// `Outer::Inner`, labels drop their trailing `:`. Unknown kinds render
    /// as the empty string.
    #[must_use]
    pub fn render_text(self) -> String {
        let Some(kind) = self.kind() else {
            return String::new();
        };
        match kind {
            Kind::Label => self
                .token_text()
                .map(|t| t.strip_suffix(':').unwrap_or(t).to_string())
                .unwrap_or_default(),
            k if k.is_token() => self.token_text().unwrap_or_default().to_string(),
            Kind::StringContent | Kind::Word => self
                .children()
                .into_iter()
                .map(NodeRef::render_text)
                .collect(),
            Kind::StringLiteral
            | Kind::XstringLiteral
            | Kind::SymbolLiteral
            | Kind::Symbol
            | Kind::DynaSymbol
            | Kind::ConstRef
            | Kind::VarRef
            | Kind::Vcall
            | Kind::VarField => self.slot(0).render_text(),
            Kind::TopConstRef => format!("::{}", self.slot(0).render_text()),
            Kind::ConstPathRef => format!(
                "{}::{}",
                self.slot(0).render_text(),
                self.slot(1).render_text()
            ),
            Kind::Aref => format!(
                "{}[{}]",
                self.slot(0).render_text(),
                self.slot(1)
                    .argument_values()
                    .first()
                    .copied()
                    .unwrap_or_default()
                    .render_text()
            ),
            Kind::Call | Kind::Field => format!(
                "{}.{}",
                self.subject().render_text(),
                self.message().render_text()
            ),
            _ => String::new(),
        }
    }

    /// True for constants and references to constants.
    #[must_use]
    pub fn is_constant_reference(self) -> bool {
        match self.kind() {
            Some(Kind::Const | Kind::ConstRef | Kind::ConstPathRef | Kind::TopConstRef) => true,
            Some(Kind::VarRef | Kind::Vcall) => self.slot(0).is(&Kind::Const),
            _ => false,
        }
    }
}

/// Kinds whose line is the line of their first node child.
fn takes_first_child_line(kind: &Kind) -> bool {
    matches!(
        kind,
        Kind::Def
            | Kind::Defs
            | Kind::Command
            | Kind::CommandCall
            | Kind::Call
            | Kind::Fcall
            | Kind::MethodAddArg
            | Kind::MethodAddBlock
            | Kind::VarRef
            | Kind::Vcall
            | Kind::ConstRef
            | Kind::TopConstRef
            | Kind::ConstPathRef
            | Kind::Class
            | Kind::Module
            | Kind::If
            | Kind::Unless
            | Kind::Elsif
            | Kind::Ifop
            | Kind::IfMod
            | Kind::UnlessMod
            | Kind::Binary
            | Kind::Alias
            | Kind::SymbolLiteral
            | Kind::Symbol
            | Kind::Aref
            | Kind::Hash
            | Kind::AssoclistFromArgs
            | Kind::AssocNew
            | Kind::StringLiteral
            | Kind::StringContent
            | Kind::DynaSymbol
            | Kind::Massign
            | Kind::VarField
            | Kind::Assign
            | Kind::Opassign
            | Kind::Field
            | Kind::Dot2
            | Kind::Dot3
            | Kind::Unary
            | Kind::Paren
            | Kind::Return
            | Kind::Yield
            | Kind::ArgsAddBlock
            | Kind::ArgParen
            | Kind::BareAssocHash
            | Kind::List
    )
}

/// Pre-order iterator over descendants.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children = node.children();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

/// Predicates for [`NodeRef::find_all`] and friends.
///
/// Every predicate is optional. Each holds a set of acceptable values; a node
/// matches a predicate when it matches any value in the set, and matches the
/// pattern when it matches every non-empty predicate.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    kinds: Vec<Kind>,
    subjects: Vec<String>,
    messages: Vec<String>,
    texts: Vec<String>,
}

impl Pattern {
    /// Creates a pattern that matches every node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts nodes of this kind.
    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Accepts nodes of any of these kinds.
    #[must_use]
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    /// Accepts nodes whose rendered subject equals `subject`.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Accepts nodes whose rendered subject is any of `subjects`.
    #[must_use]
    pub fn subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects.extend(subjects.into_iter().map(Into::into));
        self
    }

    /// Accepts nodes whose rendered message equals `message`.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Accepts nodes whose rendered message is any of `messages`.
    #[must_use]
    pub fn messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.extend(messages.into_iter().map(Into::into));
        self
    }

    /// Accepts nodes whose rendered text equals `text`.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.texts.push(text.into());
        self
    }

    /// Accepts nodes whose rendered text is any of `texts`.
    #[must_use]
    pub fn texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts.extend(texts.into_iter().map(Into::into));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn tree(value: Value) -> SyntaxNode {
        SyntaxNode::from_json(&value).unwrap()
    }

    fn ivar(name: &str, line: usize) -> Value {
        json!(["var_ref", ["@ivar", name, [line, 4]]])
    }

    fn ident(name: &str, line: usize) -> Value {
        json!(["@ident", name, [line, 10]])
    }

    fn call(recv: Value, msg: &str, line: usize) -> Value {
        json!(["call", recv, ["@period", ".", [line, 9]], ident(msg, line)])
    }

    fn sym(name: &str, line: usize) -> Value {
        json!(["symbol_literal", ["symbol", ident(name, line)]])
    }

    #[test]
    fn null_object_is_total() {
        let absent = NodeRef::Absent;
        assert!(absent.subject().message().arguments().is_absent());
        assert_eq!(absent.render_text(), "");
        assert_eq!(absent.len(), 0);
        assert!(absent.is_empty());
        assert_eq!(absent.line(), None);
        assert!(absent.statements().is_empty());
        assert!(absent.array_values().is_empty());
        assert_eq!(absent.hash_size(), 0);
        assert!(absent.hash_value("only").is_absent());
        assert!(absent.all_conditions().is_empty());
    }

    #[test]
    fn accessors_outside_their_domain_return_null() {
        let node = tree(ivar("@post", 1));
        let node = NodeRef::from(&node);
        assert!(node.message().is_absent());
        assert!(node.class_name().is_absent());
        assert!(node.method_name().is_absent());
        assert!(node.body().is_absent());
        assert!(node.block().is_absent());
        assert!(node.conditional().is_absent());
        assert!(node.hash_value("a").is_absent());
        assert!(node.statements().is_empty());
    }

    #[test]
    fn call_projections() {
        let node = tree(call(call(ivar("@post", 2), "user", 2), "name", 2));
        let node = NodeRef::from(&node);
        assert_eq!(node.message().render_text(), "name");
        assert_eq!(node.subject().message().render_text(), "user");
        assert_eq!(node.subject().subject().render_text(), "@post");
        assert_eq!(node.render_text(), "@post.user.name");
        assert_eq!(node.line(), Some(2));
    }

    #[test]
    fn command_arguments_and_hash() {
        let node = tree(json!([
            "command",
            ident("resources", 3),
            ["args_add_block", [
                sym("posts", 3),
                ["bare_assoc_hash", [
                    ["assoc_new", ["@label", "only:", [3, 20]],
                        ["array", [sym("show", 3), sym("index", 3)]]],
                    ["assoc_new", ["@label", "controller:", [3, 40]],
                        ["string_literal", ["string_content", ["@tstring_content", "articles", [3, 53]]]]]
                ]]
            ], false]
        ]));
        let node = NodeRef::from(&node);
        assert_eq!(node.message().render_text(), "resources");
        let args = node.call_arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].render_text(), "posts");
        let options = args[1];
        assert_eq!(options.hash_keys(), vec!["only", "controller"]);
        assert_eq!(options.hash_size(), 2);
        assert_eq!(options.hash_value("controller").render_text(), "articles");
        assert_eq!(options.hash_value("only").string_list(), vec!["show", "index"]);
        assert_eq!(options.hash_value("only").array_size(), 2);
        assert!(options.hash_value("except").is_absent());
        assert_eq!(node.line(), Some(3));
    }

    #[test]
    fn method_add_arg_delegates_to_inner_call() {
        let node = tree(json!([
            "method_add_arg",
            call(ivar("@post", 4), "update", 4),
            ["arg_paren", ["args_add_block", [ivar("@params", 4)], false]]
        ]));
        let node = NodeRef::from(&node);
        assert_eq!(node.message().render_text(), "update");
        assert_eq!(node.subject().render_text(), "@post");
        assert_eq!(node.call_arguments().len(), 1);
    }

    #[test]
    fn empty_array_has_no_values() {
        let node = tree(json!(["array", null]));
        let node = NodeRef::from(&node);
        assert!(node.array_values().is_empty());
        assert_eq!(node.array_size(), 0);
    }

    #[test]
    fn word_list_array_values() {
        let node = tree(json!([
            "array",
            [["@tstring_content", "show", [1, 3]], ["@tstring_content", "edit", [1, 8]]]
        ]));
        assert_eq!(NodeRef::from(&node).string_list(), vec!["show", "edit"]);
    }

    #[test]
    fn all_conditions_flattens_same_family() {
        let node = tree(json!([
            "binary",
            ["binary", ["vcall", ident("a", 1)], "&&", ["vcall", ident("b", 1)]],
            "&&",
            ["vcall", ident("c", 1)]
        ]));
        let names: Vec<String> = NodeRef::from(&node)
            .all_conditions()
            .into_iter()
            .map(NodeRef::render_text)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn all_conditions_on_plain_node_is_itself() {
        let node = tree(json!(["vcall", ident("a", 1)]));
        let node = NodeRef::from(&node);
        assert_eq!(node.all_conditions(), vec![node]);

        let sum = tree(json!(["binary", ["vcall", ident("a", 1)], "+", ["vcall", ident("b", 1)]]));
        let sum = NodeRef::from(&sum);
        assert_eq!(sum.all_conditions(), vec![sum]);
    }

    #[test]
    fn find_all_with_sets() {
        let body = tree(json!([
            "program",
            [
                call(ivar("@post", 1), "title", 1),
                call(ivar("@post", 2), "body", 2),
                call(ivar("@user", 3), "name", 3)
            ]
        ]));
        let root = NodeRef::from(&body);
        let pattern = Pattern::new().kind(Kind::Call).subject("@post");
        assert_eq!(root.count_matches(&pattern), 2);

        let pattern = Pattern::new()
            .kind(Kind::Call)
            .messages(["name", "body"]);
        let found: Vec<Option<usize>> = root.find_all(&pattern).into_iter().map(NodeRef::line).collect();
        assert_eq!(found, vec![Some(2), Some(3)]);

        let missing = Pattern::new().kind(Kind::Call).message("destroy");
        assert!(root.find_first(&missing).is_absent());
        assert_eq!(root.find_first(&Pattern::new().kind(Kind::Ivar)).render_text(), "@post");
    }

    #[test]
    fn walk_visits_each_descendant_once() {
        let node = tree(call(ivar("@post", 1), "title", 1));
        let mut kinds = Vec::new();
        NodeRef::from(&node).walk(|n| kinds.push(n.kind().unwrap().to_string()));
        assert_eq!(kinds, vec!["var_ref", "@ivar", "@period", "@ident"]);
    }

    #[test]
    fn class_and_def_projections() {
        let node = tree(json!([
            "class",
            ["const_ref", ["@const", "PostsController", [1, 6]]],
            ["const_path_ref", ["var_ref", ["@const", "Admin", [1, 24]]], ["@const", "BaseController", [1, 31]]],
            ["bodystmt", [
                ["def", ident("index", 2), ["params", null, null, null, null, null, null, null],
                    ["bodystmt", [["void_stmt"]], null, null, null]]
            ], null, null, null]
        ]));
        let node = NodeRef::from(&node);
        assert_eq!(node.class_name().render_text(), "PostsController");
        assert_eq!(node.base_class().render_text(), "Admin::BaseController");
        let stmts = node.statements();
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].method_name().render_text(), "index");
        assert!(stmts[0].statements().is_empty());
        assert_eq!(stmts[0].line(), Some(2));
        assert_eq!(node.line(), Some(1));
    }

    #[test]
    fn constant_references() {
        let konst = tree(json!(["var_ref", ["@const", "Post", [1, 0]]]));
        let local = tree(json!(["var_ref", ["@ident", "post", [1, 0]]]));
        let top = tree(json!(["top_const_ref", ["@const", "Post", [1, 2]]]));
        assert!(NodeRef::from(&konst).is_constant_reference());
        assert!(!NodeRef::from(&local).is_constant_reference());
        assert!(NodeRef::from(&top).is_constant_reference());
        assert_eq!(NodeRef::from(&top).render_text(), "::Post");
    }

    #[test]
    fn if_conditional_and_statements() {
        let node = tree(json!([
            "if",
            ["var_ref", ["@ident", "ok", [5, 3]]],
            [call(ivar("@post", 6), "save", 6)],
            ["else", [call(ivar("@post", 8), "destroy", 8)]]
        ]));
        let node = NodeRef::from(&node);
        assert_eq!(node.conditional().render_text(), "ok");
        assert_eq!(node.statements().len(), 1);
        assert_eq!(node.slot(2).statements()[0].message().render_text(), "destroy");
        assert_eq!(node.line(), Some(5));
    }

    #[test]
    fn assign_projections() {
        let node = tree(json!([
            "assign",
            ["field", ivar("@post", 3), ["@period", ".", [3, 9]], ident("title", 3)],
            ["string_literal", ["string_content", ["@tstring_content", "x", [3, 20]]]]
        ]));
        let node = NodeRef::from(&node);
        assert_eq!(node.left_value().render_text(), "@post.title");
        assert_eq!(node.right_value().render_text(), "x");
        assert_eq!(node.subject().render_text(), "@post.title");
        assert_eq!(node.line(), Some(3));
    }
}
