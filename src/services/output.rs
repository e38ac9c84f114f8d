use crate::domain::constants::TOOL_NAME;
use crate::domain::models::RunConfig;

/// Informational line; silenced by `--quiet`.
pub fn say(config: &RunConfig, line: impl AsRef<str>) {
    if !config.quiet {
        println!("{}", line.as_ref());
    }
}

pub fn banner(config: &RunConfig) {
    say(
        config,
        format!("Running {} version {}", TOOL_NAME, env!("CARGO_PKG_VERSION")),
    );
}

/// Argument validation failure: printed even when quiet, followed by a blank line.
pub fn refuse(lines: &[&str]) {
    for line in lines {
        println!("{}", line);
    }
    println!();
}
