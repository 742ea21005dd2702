//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# treelint configuration

# Rule preset: "recommended" or "all"
preset = "recommended"

[runner]
# Directory holding the serialized trees (default: current directory)
# root = "./trees"

# Suffix of tree files; `src/app.js.ast.json` reports as `src/app.js`
suffix = ".ast.json"

# Glob patterns, relative to root, of tree files to skip
exclude = [
    "**/node_modules/**",
]

# Skip malformed tree files instead of failing
keep_going = false

# Rule configurations
# Each rule can be enabled/disabled; rules outside the preset run when
# explicitly enabled

[rules.no-eval]
enabled = true
callees = ["eval"]

# [rules.no-await-in-loop]
# enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_default_config(Path::new("treelint.toml"), force)?;

    println!("Created treelint.toml");
    println!("\nNext steps:");
    println!("  1. Edit treelint.toml to configure rules");
    println!("  2. Run: treelint check");

    Ok(())
}

fn write_default_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
