//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# railsbp configuration

[analyzer]
# Extra exclusion regexes, matched against paths relative to the app root
exclude = []

# Directories skipped by default that should be reviewed anyway
# include_dirs = ["spec"]

# Stop instead of skipping files Ruby cannot parse
fail_on_parse_error = false

# Check configurations
# Every check can be disabled and can skip files through `ignored_files`

[checks.LongLineCheck]
enabled = true
max_line_length = 80

[checks.MoveModelLogicIntoModelCheck]
use_count = 4

[checks.OveruseRouteCustomizationsCheck]
customize_count = 3

[checks.NeedlessDeepNestingCheck]
nested_count = 2

[checks.RemoveUnusedMethodsInControllersCheck]
except_methods = []
# ignored_files = ["app/controllers/api/"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("railsbp.toml");
    write_config(config_path, force)?;

    println!("Created railsbp.toml");
    println!("\nNext steps:");
    println!("  1. Edit railsbp.toml to configure checks");
    println!("  2. Run: railsbp check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
