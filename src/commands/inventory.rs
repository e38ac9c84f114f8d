use super::{input_location, output_dir, refuse_missing};
use crate::*;

pub fn handle_inventory_commands(cli: &Cli, config: &RunConfig) -> anyhow::Result<bool> {
    let Commands::Inventory {
        location,
        output,
        overwrite,
        format,
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
    if output.exists() && !overwrite {
        refuse(&[
            "ERROR: <output> file already exists.",
            "Select a different file name or use the --overwrite option after the `inventory`.",
        ]);
        return Ok(true);
    }
    let log_dir = output_dir(&output);
    if !log_dir.is_dir() {
        refuse(&["ERROR: Path to the <output> does not exists. Please check and correct the <output>."]);
        return Ok(true);
    }
    if !FORMATS.contains(&format.as_str()) {
        let line = format!("ERROR: Output format: {} is not supported.", format);
        refuse(&[line.as_str()]);
        return Ok(true);
    }
    if format != "json" && !output.to_string_lossy().ends_with(".csv") {
        refuse(&["ERROR: <output> must be a CSV file ending with \".csv\"."]);
        return Ok(true);
    }

    say(
        config,
        format!(
            "Collecting the inventory from location: {} and writing output to: {}",
            location.display(),
            output.display()
        ),
    );
    let (location, _scratch) = input_location(&location)?;
    let (mut issues, abouts) = collect_inventory(&location);
    if abouts.is_empty() {
        issues = vec![Issue::error("No ABOUT files is found. Generation halted.")];
    } else {
        issues.extend(write_output(&abouts, &output, format)?);
    }
    log_errors(&issues, Some(&log_dir), config.verbosity, config)?;
    Ok(true)
}
