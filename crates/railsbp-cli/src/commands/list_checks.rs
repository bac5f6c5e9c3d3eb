//! List checks command implementation.

use railsbp_rules::{builtin_checks, Stage};

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks:\n");
    println!("{:<42} Phase", "Name");
    println!("{}", "-".repeat(60));

    for check in builtin_checks()
        .into_iter()
        .filter(|c| c.stage != Stage::Prepare)
    {
        println!("{:<42} {}", check.name, check.stage);
    }

    println!("\nPrepare checks always run; they build the tables reviews read.");

    println!("\nUse --checks to run only some of them, e.g.:");
    println!("  railsbp check --checks MoveModelLogicIntoModelCheck,LongLineCheck");
}
