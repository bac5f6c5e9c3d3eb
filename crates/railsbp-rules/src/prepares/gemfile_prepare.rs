//! Reads locked gem versions from `Gemfile.lock`.

use crate::presets::{BuiltinCheck, Stage};
use once_cell::sync::Lazy;
use railsbp_core::patterns::{builtin, GEMFILE_LOCK};
use railsbp_core::{CheckBox, CheckConfig, Checker, FilePattern};
use regex::Regex;

/// Check name.
pub const NAME: &str = "GemfilePrepare";

/// A resolved spec line: four spaces, name, version in parentheses.
#[allow(clippy::expect_used)]
static SPEC_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {4}([^ (]+) \(([^)]+)\)$").expect("valid regex"));

/// Fills `gems`.
#[derive(Debug, Clone, Default)]
pub struct GemfilePrepare;

impl GemfilePrepare {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BuiltinCheck for GemfilePrepare {
    const NAME: &'static str = NAME;
    const STAGE: Stage = Stage::Prepare;

    fn configure(_config: &CheckConfig) -> Self {
        Self::new()
    }

    fn build(self, ignored: Vec<FilePattern>) -> CheckBox {
        Checker::builder(NAME)
            .interesting_files([builtin(&GEMFILE_LOCK)])
            .ignored_files(ignored)
            .on_text(|_: &mut (), cx, content| {
                for line in content.lines() {
                    if let Some(caps) = SPEC_LINE.captures(line.trim_end_matches('\r')) {
                        cx.tables.gems.add_gem(&caps[1], &caps[2]);
                    }
                }
                Ok(())
            })
            .boxed(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check_text;
    use railsbp_core::AnalysisContext;

    const LOCK: &str = "GEM
  remote: https://rubygems.org/
  specs:
    actionpack (7.1.2)
      rack (>= 2.2.4)
    rails (7.1.2)
      actionpack (= 7.1.2)
    strong_parameters (0.2.3)

DEPENDENCIES
  rails (~> 7.1)
";

    #[test]
    fn records_resolved_specs_only() {
        let mut check = GemfilePrepare::new().build(Vec::new());
        let mut tables = AnalysisContext::new();
        check_text(check.as_mut(), "Gemfile.lock", LOCK, &mut tables);
        assert_eq!(tables.gems.gem_version("rails"), Some("7.1.2"));
        assert!(tables.gems.has_gem("strong_parameters"));
        assert!(!tables.gems.has_gem("rack"));
        assert_eq!(tables.gems.len(), 3);
    }
}
