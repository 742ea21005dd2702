//! List rules command implementation.

use treelint_rules::{all_rules, recommended_rules};

/// Runs the list-rules command.
pub fn run() {
    let recommended: Vec<&str> = recommended_rules().iter().map(|r| r.name()).collect();

    println!("Available rules:\n");
    println!("{:<20} {:<12} Description", "Name", "Preset");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        let preset = if recommended.contains(&rule.name()) {
            "recommended"
        } else {
            "all"
        };
        println!("{:<20} {:<12} {}", rule.name(), preset, rule.description());
    }

    println!("\nPresets:");
    println!("  recommended  - {} (default)", recommended.join(", "));
    println!("  all          - Every rule above");

    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  treelint check --rules no-eval,no-await-in-loop");
}
