//! Parser backed by Ruby's own Ripper.
//!
//! Each file is piped through `ruby -rripper -rjson`, which prints
//! `{"tree": <sexp>, "comments": [[line, text], ...]}`.

use railsbp_core::{ParseError, ParsedSource, Parser};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Reads source from stdin and prints the tree plus comment tokens.
const SCRIPT: &str = r#"src = $stdin.read
tree = Ripper.sexp(src)
comments = Ripper.lex(src).select { |t| t[1] == :on_comment }.map { |t| [t[0][0], t[2]] }
$stdout.write(JSON.generate({ "tree" => tree, "comments" => comments }))"#;

/// Runs a Ruby interpreter per file.
#[derive(Debug, Clone)]
pub struct RipperParser {
    ruby: PathBuf,
}

impl RipperParser {
    /// Uses the given interpreter.
    #[must_use]
    pub fn new(ruby: impl Into<PathBuf>) -> Self {
        Self { ruby: ruby.into() }
    }
}

impl Parser for RipperParser {
    fn parse(&self, path: &Path, content: &str) -> Result<ParsedSource, ParseError> {
        debug!("Parsing {}", path.display());
        let mut child = Command::new(&self.ruby)
            .args(["-rripper", "-rjson", "-e", SCRIPT])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ParseError::new(format!("failed to run {}: {e}", self.ruby.display())))?;

        let fed = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(content.as_bytes()));
        if let Err(e) = fed {
            // The interpreter stopped reading; reap it before giving up.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ParseError::new(format!("failed to feed {}: {e}", path.display())));
        }
        let output = child
            .wait_with_output()
            .map_err(|e| ParseError::new(format!("ruby did not finish: {e}")))?;

        if !output.status.success() {
            return Err(ParseError::new(format!(
                "ruby exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let json = String::from_utf8_lossy(&output.stdout);
        ParsedSource::from_json_str(&json).map_err(|e| ParseError::new(format!("syntax error: {e}")))
    }
}
