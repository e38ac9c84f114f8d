use crate::*;

/// `export` and `fetch` only announce themselves for now.
pub fn handle_stub_commands(cli: &Cli, config: &RunConfig) -> anyhow::Result<bool> {
    let line = match &cli.command {
        Commands::Export => "Exporting zip archive...",
        Commands::Fetch => "Updating ABOUT files...",
        _ => return Ok(false),
    };
    banner(config);
    say(config, line);
    Ok(true)
}
