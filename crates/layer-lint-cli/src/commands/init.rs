//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# layer-lint configuration

[validator]
# "allow" passes edges no rule covers; "deny" flags them.
default-policy = "allow"

# Flag dependency cycles between components.
no-circular-deps = true

# "unclassified" pools unknown units into one component;
# "reject" aborts the run when a unit matches no pattern.
unmapped-units = "unclassified"

[[components]]
name = "domain"
paths = ["src/domain/**"]
# The domain imports nothing outside itself.
isolate = true

[[components]]
name = "application"
paths = ["src/application/**"]
allow = ["domain"]

[[components]]
name = "infrastructure"
paths = ["src/infrastructure/**"]
allow = ["domain", "application"]

[[components]]
name = "shared"
paths = ["src/shared/**"]

# Explicit prohibitions beat silence under default-policy = "allow".
# [[deny]]
# from = "application"
# to = "infrastructure"
# severity = "warning"
"#;

/// Writes a starter configuration file.
pub fn run(config_path: &Path, force: bool) -> Result<i32> {
    if config_path.exists() && !force {
        bail!(
            "configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to describe your components", config_path.display());
    println!("  2. Run: layer-lint check --imports imports.json");

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::Config;

    #[test]
    fn starter_config_parses() {
        Config::parse(DEFAULT_CONFIG).expect("starter config should parse");
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layer-lint.toml");

        assert_eq!(run(&path, false).unwrap(), 0);
        assert!(run(&path, false).is_err());
        assert_eq!(run(&path, true).unwrap(), 0);
    }
}
