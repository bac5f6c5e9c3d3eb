//! Helpers for driving a single check over a hand-built tree, plus builders
//! for the Ripper shapes the tests use most.

use railsbp_core::{AnalysisContext, Check, Checker, NodeRef, SyntaxNode};
use serde_json::{json, Value};
use std::path::Path;

pub(crate) fn tree(value: Value) -> SyntaxNode {
    SyntaxNode::from_json(&value).unwrap()
}

fn walk(check: &mut dyn Check, node: NodeRef<'_>, file: &Path, tables: &mut AnalysisContext) {
    let interested = node
        .kind()
        .is_some_and(|kind| check.interesting_kinds().contains(kind));
    if interested {
        check.node_start(node, file, tables).unwrap();
    }
    for child in node.children() {
        walk(check, child, file, tables);
    }
    if interested {
        check.node_end(node, file, tables).unwrap();
    }
}

/// Dispatches `root` to a boxed check if it wants `path`.
pub(crate) fn walk_box(check: &mut dyn Check, root: &SyntaxNode, path: &str, tables: &mut AnalysisContext) {
    let file = Path::new(path);
    if check.parse_file(file) {
        walk(check, NodeRef::from(root), file, tables);
    }
}

/// Dispatches `root` as file `path` with shared tables.
pub(crate) fn dispatch_in<S: Send + 'static>(
    mut check: Checker<S>,
    path: &str,
    root: &SyntaxNode,
    tables: &mut AnalysisContext,
) -> Checker<S> {
    walk_box(&mut check, root, path, tables);
    check
}

/// Dispatches `root` as file `path` with fresh tables.
pub(crate) fn dispatch<S: Send + 'static>(check: Checker<S>, path: &str, root: &SyntaxNode) -> Checker<S> {
    let mut tables = AnalysisContext::new();
    dispatch_in(check, path, root, &mut tables)
}

/// Feeds raw text to a text check.
pub(crate) fn check_text(check: &mut dyn Check, path: &str, content: &str, tables: &mut AnalysisContext) {
    let file = Path::new(path);
    if check.parse_file(file) {
        check.check_text(file, content, tables).unwrap();
    }
}

pub(crate) fn program(body: Vec<Value>) -> SyntaxNode {
    tree(json!(["program", body]))
}

pub(crate) fn ident(name: &str, line: usize) -> Value {
    json!(["@ident", name, [line, 2]])
}

pub(crate) fn sym(name: &str, line: usize) -> Value {
    json!(["symbol_literal", ["symbol", ["@ident", name, [line, 12]]]])
}

pub(crate) fn string(text: &str, line: usize) -> Value {
    json!(["string_literal", ["string_content", ["@tstring_content", text, [line, 9]]]])
}

pub(crate) fn constant(name: &str, line: usize) -> Value {
    json!(["var_ref", ["@const", name, [line, 8]]])
}

pub(crate) fn ivar(name: &str, line: usize) -> Value {
    json!(["var_ref", ["@ivar", name, [line, 4]]])
}

pub(crate) fn keyword(name: &str, line: usize) -> Value {
    json!(["var_ref", ["@kw", name, [line, 20]]])
}

pub(crate) fn label(name: &str, value: Value, line: usize) -> Value {
    json!(["assoc_new", ["@label", format!("{name}:"), [line, 20]], value])
}

pub(crate) fn options(pairs: Vec<Value>) -> Value {
    json!(["bare_assoc_hash", pairs])
}

pub(crate) fn array(items: Vec<Value>) -> Value {
    json!(["array", items])
}

pub(crate) fn command(name: &str, args: Vec<Value>, line: usize) -> Value {
    json!(["command", ident(name, line), ["args_add_block", args, false]])
}

/// `receiver.name args` without parentheses.
pub(crate) fn command_call(receiver: Value, name: &str, args: Vec<Value>, line: usize) -> Value {
    json!(["command_call", receiver, ["@period", ".", [line, 3]], ident(name, line),
        ["args_add_block", args, false]])
}

/// `receiver.name` without arguments.
pub(crate) fn call(receiver: Value, name: &str, line: usize) -> Value {
    json!(["call", receiver, ["@period", ".", [line, 6]], ident(name, line)])
}

/// `name(args)` without a receiver.
pub(crate) fn fcall(name: &str, args: Vec<Value>, line: usize) -> Value {
    json!(["method_add_arg", ["fcall", ident(name, line)], ["arg_paren", ["args_add_block", args, false]]])
}

/// `receiver.name(args)`.
pub(crate) fn call_with(receiver: Value, name: &str, args: Vec<Value>, line: usize) -> Value {
    json!(["method_add_arg", call(receiver, name, line), ["arg_paren", ["args_add_block", args, false]]])
}

/// `receiver.name = value`.
pub(crate) fn field_assign(receiver: Value, name: &str, value: Value, line: usize) -> Value {
    json!(["assign", ["field", receiver, ["@period", ".", [line, 6]], ident(name, line)], value])
}

/// `@name = value`.
pub(crate) fn ivar_assign(name: &str, value: Value, line: usize) -> Value {
    json!(["assign", ["var_field", ["@ivar", name, [line, 4]]], value])
}

pub(crate) fn block(head: Value, body: Vec<Value>) -> Value {
    json!(["method_add_block", head, ["do_block", null, ["bodystmt", body, null, null, null]]])
}

/// `name do ... end` with no arguments (`member do`).
pub(crate) fn bare_block(name: &str, body: Vec<Value>, line: usize) -> Value {
    block(json!(["method_add_arg", ["fcall", ident(name, line)], []]), body)
}

/// `create_table "posts" do |t| ... end`.
pub(crate) fn table_block(name: &str, body: Vec<Value>, line: usize) -> Value {
    json!(["method_add_block", command("create_table", vec![string(name, line)], line),
        ["do_block",
            ["block_var", ["params", [["@ident", "t", [line, 30]]], null, null, null, null, null, null], false],
            ["bodystmt", body, null, null, null]]])
}

/// `t.name args` inside a table block.
pub(crate) fn column(kind: &str, args: Vec<Value>, line: usize) -> Value {
    command_call(json!(["var_ref", ["@ident", "t", [line, 4]]]), kind, args, line)
}

fn statements(body: Vec<Value>) -> Vec<Value> {
    if body.is_empty() {
        vec![json!(["void_stmt"])]
    } else {
        body
    }
}

pub(crate) fn def(name: &str, body: Vec<Value>, line: usize) -> Value {
    let body = statements(body);
    json!(["def", ["@ident", name, [line, 6]], ["params", null, null, null, null, null, null, null],
        ["bodystmt", body, null, null, null]])
}

pub(crate) fn class(name: &str, parent: Option<Value>, body: Vec<Value>, line: usize) -> Value {
    let body = statements(body);
    json!(["class", ["const_ref", ["@const", name, [line, 6]]], parent,
        ["bodystmt", body, null, null, null]])
}

pub(crate) fn module(name: &str, body: Vec<Value>, line: usize) -> Value {
    json!(["module", ["const_ref", ["@const", name, [line, 7]]],
        ["bodystmt", body, null, null, null]])
}

/// `A::B` as a superclass expression.
pub(crate) fn const_path(outer: &str, inner: &str, line: usize) -> Value {
    json!(["const_path_ref", ["var_ref", ["@const", outer, [line, 14]]], ["@const", inner, [line, 30]]])
}

/// Draws `body` inside `Rails.application.routes.draw do ... end`.
pub(crate) fn routes(body: Vec<Value>) -> SyntaxNode {
    let head = call(call(call(constant("Rails", 1), "application", 1), "routes", 1), "draw", 1);
    program(vec![block(head, body)])
}
