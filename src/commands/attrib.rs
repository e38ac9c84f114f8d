use super::{input_location, output_dir, refuse_missing};
use crate::*;

pub fn handle_attrib_commands(
    cli: &Cli,
    config: &RunConfig,
    settings: &Settings,
) -> anyhow::Result<bool> {
    let Commands::Attrib {
        location,
        output,
        inventory_location,
        template,
        mapping,
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
    if output.is_dir() {
        refuse(&["ERROR: <output> must be a file, not a directory."]);
        return Ok(true);
    }
    let log_dir = output_dir(&output);
    if !log_dir.is_dir() {
        refuse(&["ERROR: Path to the <output> does not exists. Please check and correct the <output>."]);
        return Ok(true);
    }
    let template = match template {
        Some(t) => {
            let t = std::path::absolute(t)?;
            if refuse_missing(&t) {
                return Ok(true);
            }
            Some(t)
        }
        None => None,
    };
    let inventory = inventory_location
        .as_ref()
        .map(std::path::absolute)
        .transpose()?;

    say(config, "Generating attribution...");
    let (location, _scratch) = input_location(&location)?;
    let (mut issues, abouts) = collect_inventory(&location);
    let (mapping, mapping_issues) = requested_mapping(*mapping, settings);
    issues.extend(mapping_issues);

    let opts = AttribOptions {
        template: template.as_deref(),
        inventory_location: inventory.as_deref(),
        mapping,
    };
    issues.extend(generate_and_save(&abouts, &output, &opts)?);
    log_errors(&issues, Some(&log_dir), config.verbosity, config)?;
    say(config, "Finished.");
    Ok(true)
}
