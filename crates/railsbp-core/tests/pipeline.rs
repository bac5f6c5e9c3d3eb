//! End-to-end tests of the three-phase pipeline with hand-built checks.

use railsbp_core::{
    AnalyzeError, Analyzer, CheckError, Checker, FilePattern, Kind, ParseError, ParsedSource,
    Parser, SourceFile,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Serves pre-built trees instead of running Ruby.
struct FixtureParser {
    trees: HashMap<PathBuf, Value>,
}

impl FixtureParser {
    fn new(entries: Vec<(&str, Value)>) -> Self {
        Self {
            trees: entries
                .into_iter()
                .map(|(path, tree)| (PathBuf::from(path), tree))
                .collect(),
        }
    }
}

impl Parser for FixtureParser {
    fn parse(&self, path: &Path, _content: &str) -> Result<ParsedSource, ParseError> {
        let tree = self
            .trees
            .get(path)
            .ok_or_else(|| ParseError::new(format!("syntax error in {}", path.display())))?;
        Ok(ParsedSource::from_json_str(&tree.to_string())?)
    }
}

fn routes_tree() -> Value {
    json!({
        "tree": ["program", [
            ["command", ["@ident", "resources", [2, 2]],
                ["args_add_block", [["symbol_literal", ["symbol", ["@ident", "posts", [2, 13]]]]], false]]
        ]],
        "comments": []
    })
}

fn controller_tree(comments: Value) -> Value {
    json!({
        "tree": ["program", [
            ["class", ["const_ref", ["@const", "PostsController", [1, 6]]],
                ["var_ref", ["@const", "ApplicationController", [1, 24]]],
                ["bodystmt", [["void_stmt"]], null, null, null]]
        ]],
        "comments": comments
    })
}

fn route_prepare() -> Checker<()> {
    Checker::builder("RoutePrepare")
        .interesting_kinds([Kind::Command])
        .interesting_files([FilePattern::regex(r"config/routes").unwrap()])
        .on_enter(Kind::Command, |_: &mut (), cx, node| {
            if node.message().render_text() == "resources" {
                let name = node.call_arguments()[0].render_text();
                cx.tables.routes.add_route(&[], &name, "index");
            }
            Ok(())
        })
        .build(())
}

fn routed_controller_review() -> Checker<()> {
    Checker::builder("RoutedControllerCheck")
        .interesting_kinds([Kind::Class])
        .interesting_files([FilePattern::regex(r"app/controllers/").unwrap()])
        .on_enter(Kind::Class, |_: &mut (), cx, node| {
            let name = node.class_name().render_text();
            let routed = cx.tables.routes.has_action(&name, "index");
            cx.add_error(format!("{name} routed: {routed}"));
            Ok(())
        })
        .build(())
}

fn sources() -> Vec<SourceFile> {
    vec![
        SourceFile::new("app/controllers/posts_controller.rb", "class PostsController < ApplicationController\nend\n"),
        SourceFile::new("config/routes.rb", "Rails.application.routes.draw do\n  resources :posts\nend\n"),
    ]
}

#[test]
fn review_sees_routes_declared_in_later_files() {
    let parser = FixtureParser::new(vec![
        ("app/controllers/posts_controller.rb", controller_tree(json!([]))),
        ("config/routes.rb", routes_tree()),
    ]);
    let (result, tables) = Analyzer::builder()
        .prepare(route_prepare())
        .review(routed_controller_review())
        .build()
        .unwrap()
        .analyze_with_context(&sources(), &parser)
        .unwrap();

    assert_eq!(tables.routes.len(), 1);
    assert_eq!(result.files_checked, 2);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].to_string(),
        "app/controllers/posts_controller.rb:1 - PostsController routed: true"
    );
}

#[test]
fn inline_disable_drops_review_diagnostic() {
    let parser = FixtureParser::new(vec![
        (
            "app/controllers/posts_controller.rb",
            controller_tree(json!([[1, "# rails_best_practices:disable RoutedControllerCheck"]])),
        ),
        ("config/routes.rb", routes_tree()),
    ]);
    let result = Analyzer::builder()
        .prepare(route_prepare())
        .review(routed_controller_review())
        .build()
        .unwrap()
        .analyze(&sources(), &parser)
        .unwrap();
    assert!(result.diagnostics.is_empty());
}

#[test]
fn unparseable_files_are_skipped_unless_configured() {
    let parser = FixtureParser::new(vec![("config/routes.rb", routes_tree())]);

    let result = Analyzer::builder()
        .prepare(route_prepare())
        .review(routed_controller_review())
        .build()
        .unwrap()
        .analyze(&sources(), &parser)
        .unwrap();
    assert!(result.diagnostics.is_empty());

    let err = Analyzer::builder()
        .review(routed_controller_review())
        .fail_on_parse_error(true)
        .build()
        .unwrap()
        .analyze(&sources(), &parser)
        .unwrap_err();
    assert!(matches!(err, AnalyzeError::Parse { .. }));
}

#[test]
fn failing_callback_aborts_the_run() {
    let parser = FixtureParser::new(vec![
        ("app/controllers/posts_controller.rb", controller_tree(json!([]))),
        ("config/routes.rb", routes_tree()),
    ]);
    let failing = Checker::builder("BrokenCheck")
        .interesting_kinds([Kind::Class])
        .interesting_files([FilePattern::All])
        .on_enter(Kind::Class, |_: &mut (), _, _| Err(CheckError::msg("cannot read class")))
        .build(());
    let err = Analyzer::builder()
        .review(routed_controller_review())
        .review(failing)
        .build()
        .unwrap()
        .analyze(&sources(), &parser)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "BrokenCheck failed at app/controllers/posts_controller.rb:1: cannot read class"
    );
}

#[test]
fn lexical_checks_see_every_file() {
    let lines = Checker::builder("LineCountCheck")
        .interesting_files([FilePattern::All])
        .on_text(|_: &mut (), cx, content| {
            let file = cx.file().map(Path::to_path_buf).unwrap_or_default();
            cx.add_error_at(format!("{} lines", content.lines().count()), file, 1);
            Ok(())
        })
        .build(());
    let parser = FixtureParser::new(Vec::new());
    let result = Analyzer::builder()
        .lexical(lines)
        .build()
        .unwrap()
        .analyze(&sources(), &parser)
        .unwrap();
    let messages: Vec<String> = result.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(
        messages,
        vec![
            "app/controllers/posts_controller.rb:1 - 2 lines",
            "config/routes.rb:1 - 3 lines"
        ]
    );
}
