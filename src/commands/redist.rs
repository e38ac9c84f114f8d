use super::{input_location, refuse_missing};
use crate::*;

pub fn handle_redist_commands(cli: &Cli, config: &RunConfig) -> anyhow::Result<bool> {
    let Commands::Redist {
        location,
        output,
        inventory_location,
    } = &cli.command
    else {
        return Ok(false);
    };

    banner(config);
    let location = std::path::absolute(location)?;
    let output = std::path::absolute(output)?;
    if refuse_missing(&location) {
        return Ok(true);
    }
    if output.is_file() {
        refuse(&["ERROR: <output> must be a directory, not a file."]);
        return Ok(true);
    }
    let inventory = inventory_location
        .as_ref()
        .map(std::path::absolute)
        .transpose()?;

    say(config, "Collecting redistributable files...");
    let (location, _scratch) = input_location(&location)?;
    let root = if location.is_file() {
        location
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_default()
    } else {
        location.clone()
    };
    let (mut issues, abouts) = collect_inventory(&location);
    let (redist_issues, copied) =
        collect_redistributable(&abouts, &root, &output, inventory.as_deref())?;
    issues.extend(redist_issues);

    say(config, format!("Collected {} redistributable components.", copied));
    log_errors(&issues, Some(&output), config.verbosity, config)?;
    Ok(true)
}
