//! Node kind tags.
//!
//! The parser emits an open-ended set of kinds. Kinds the engine knows about
//! get a variant; anything else is carried verbatim in [`Kind::Other`].

use std::fmt;

macro_rules! kinds {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// Kind tag of a [`SyntaxNode`](crate::SyntaxNode).
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Kind {
            $($(#[$doc])* $variant,)*
            /// A kind without a dedicated variant.
            Other(Box<str>),
        }

        impl Kind {
            /// Returns the tag as emitted by the parser.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $name,)*
                    Self::Other(name) => name,
                }
            }

            /// Maps a parser tag to a kind.
            #[must_use]
            pub fn parse(name: &str) -> Self {
                match name {
                    $($name => Self::$variant,)*
                    other => Self::Other(other.into()),
                }
            }
        }
    };
}

kinds! {
    /// Root of a file.
    Program => "program",
    /// Untagged list of nodes (statement lists, argument lists, ...).
    List => "list",
    /// `class Name < Base`.
    Class => "class",
    /// `class << self`.
    Sclass => "sclass",
    /// `module Name`.
    Module => "module",
    /// Instance method definition.
    Def => "def",
    /// Singleton method definition (`def self.name`).
    Defs => "defs",
    /// Method body with rescue/else/ensure clauses.
    Bodystmt => "bodystmt",
    /// Parameter list.
    Params => "params",
    /// Parenthesised expression or parameter list.
    Paren => "paren",
    /// `recv.msg`.
    Call => "call",
    /// `msg` with parentheses but no receiver.
    Fcall => "fcall",
    /// Bare identifier that may be a method call.
    Vcall => "vcall",
    /// `msg arg` without parentheses.
    Command => "command",
    /// `recv.msg arg` without parentheses.
    CommandCall => "command_call",
    /// A call with parenthesised arguments.
    MethodAddArg => "method_add_arg",
    /// A call with a block.
    MethodAddBlock => "method_add_block",
    /// `( args )`.
    ArgParen => "arg_paren",
    /// Argument list with an optional block argument.
    ArgsAddBlock => "args_add_block",
    /// Argument list containing a splat.
    ArgsAddStar => "args_add_star",
    /// `do ... end` block.
    DoBlock => "do_block",
    /// `{ ... }` block.
    BraceBlock => "brace_block",
    /// Block parameters.
    BlockVar => "block_var",
    /// Keyword arguments without braces.
    BareAssocHash => "bare_assoc_hash",
    /// `{ ... }` hash literal.
    Hash => "hash",
    /// Pair list inside a hash literal.
    AssoclistFromArgs => "assoclist_from_args",
    /// `key => value` or `key: value`.
    AssocNew => "assoc_new",
    /// `**opts`.
    AssocSplat => "assoc_splat",
    /// Array literal.
    Array => "array",
    /// Word of a `%W` literal.
    Word => "word",
    /// `a = b`.
    Assign => "assign",
    /// `a += b`.
    Opassign => "opassign",
    /// `a, b = c`.
    Massign => "massign",
    /// Assignment target.
    VarField => "var_field",
    /// Variable or constant reference.
    VarRef => "var_ref",
    /// `recv.attr` as an assignment target.
    Field => "field",
    /// `a[b]`.
    Aref => "aref",
    /// `a[b]` as an assignment target.
    ArefField => "aref_field",
    /// Constant in a definition name.
    ConstRef => "const_ref",
    /// `A::B`.
    ConstPathRef => "const_path_ref",
    /// `::A`.
    TopConstRef => "top_const_ref",
    /// `if`.
    If => "if",
    /// `unless`.
    Unless => "unless",
    /// `elsif`.
    Elsif => "elsif",
    /// `else`.
    Else => "else",
    /// `stmt if cond`.
    IfMod => "if_mod",
    /// `stmt unless cond`.
    UnlessMod => "unless_mod",
    /// `cond ? a : b`.
    Ifop => "ifop",
    /// `while`.
    While => "while",
    /// `until`.
    Until => "until",
    /// `case`.
    Case => "case",
    /// `when`.
    When => "when",
    /// Binary operator expression.
    Binary => "binary",
    /// Unary operator expression.
    Unary => "unary",
    /// `begin ... end`.
    Begin => "begin",
    /// `rescue` clause.
    Rescue => "rescue",
    /// `ensure` clause.
    Ensure => "ensure",
    /// `return`.
    Return => "return",
    /// `yield`.
    Yield => "yield",
    /// `a..b`.
    Dot2 => "dot2",
    /// `a...b`.
    Dot3 => "dot3",
    /// String literal.
    StringLiteral => "string_literal",
    /// Backtick string.
    XstringLiteral => "xstring_literal",
    /// String body.
    StringContent => "string_content",
    /// `#{}` interpolation.
    StringEmbexpr => "string_embexpr",
    /// `:sym`.
    SymbolLiteral => "symbol_literal",
    /// Symbol body.
    Symbol => "symbol",
    /// `:"sym"`.
    DynaSymbol => "dyna_symbol",
    /// `alias new old`.
    Alias => "alias",
    /// `alias $new $old`.
    VarAlias => "var_alias",
    /// Empty statement.
    VoidStmt => "void_stmt",
    /// Identifier token.
    Ident => "@ident",
    /// Constant token.
    Const => "@const",
    /// Instance variable token.
    Ivar => "@ivar",
    /// Class variable token.
    Cvar => "@cvar",
    /// Global variable token.
    Gvar => "@gvar",
    /// Keyword token.
    Kw => "@kw",
    /// `key:` label token.
    Label => "@label",
    /// String content token.
    TstringContent => "@tstring_content",
    /// Integer token.
    Int => "@int",
    /// Float token.
    Float => "@float",
    /// `.` token.
    Period => "@period",
    /// Operator token.
    Op => "@op",
}

impl Kind {
    /// Returns true for scanner tokens, which carry their own position.
    #[must_use]
    pub fn is_token(&self) -> bool {
        self.as_str().starts_with('@')
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Kind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}
