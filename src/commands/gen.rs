use super::{refuse_missing, refuse_not_dir};
use crate::*;

pub fn handle_gen_commands(
    cli: &Cli,
    config: &RunConfig,
    settings: &Settings,
) -> anyhow::Result<bool> {
    let Commands::Gen {
        location,
        output,
        mapping,
        license_text_location,
        extract_license,
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
    let lower = location.to_string_lossy().to_ascii_lowercase();
    if !location.is_file() || !(lower.ends_with(".csv") || lower.ends_with(".json")) {
        refuse(&["ERROR: Input file. Only .csv and .json files are supported."]);
        return Ok(true);
    }
    if refuse_not_dir(&output) {
        return Ok(true);
    }
    let license_dir = match license_text_location {
        Some(dir) => {
            let dir = std::path::absolute(dir)?;
            if refuse_not_dir(&dir) {
                return Ok(true);
            }
            Some(dir)
        }
        None => None,
    };

    say(config, "Generating ABOUT files...");
    let (mapping, mut issues) = requested_mapping(*mapping, settings);

    let api = match extract_license.as_deref() {
        Some([api_url, api_key]) => {
            match LicenseApi::new(api_url, api_key, settings.license_api.timeout_ms) {
                Ok(api) => Some(api),
                Err(e) => {
                    issues.push(Issue::error(e.to_string()));
                    None
                }
            }
        }
        _ => None,
    };
    let opts = GenOptions {
        mapping,
        license_source: api.as_ref().map(|a| a as &dyn LicenseSource),
    };
    let (gen_issues, abouts) = generate(&location, &output, &opts)?;
    issues.extend(gen_issues);

    if let Some(dir) = license_dir {
        let (pairs, missing) = verify_license_files(&abouts, &dir);
        copy_files(&pairs)?;
        issues.extend(missing);
    }

    say(
        config,
        format!(
            "Generated {} ABOUT files with {} errors and/or warning",
            abouts.len(),
            count_problems(&issues)
        ),
    );
    log_errors(&issues, Some(&output), config.verbosity, config)?;
    Ok(true)
}
