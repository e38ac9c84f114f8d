use crate::about::{about_file_rel, apply_mapping, default_about_resource, About, Validation};
use crate::domain::constants::{ABOUT_FILE_PATH_ATTR, LICENSE_EXTENSION};
use crate::domain::models::{unique_issues, Issue, LicenseInfo};
use crate::services::inventory::{load_inventory, row_value};
use crate::services::license_api::{fetch_license_texts, parse_license_expression, LicenseSource};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Default)]
pub struct GenOptions<'a> {
    /// `about_field -> column` renames applied to every row.
    pub mapping: Option<&'a BTreeMap<String, String>>,
    /// Where to look up license texts for `license_expression` keys.
    pub license_source: Option<&'a dyn LicenseSource>,
}

/// Generate ABOUT files under `output` from the inventory at `location`.
///
/// Rows without a usable `about_file_path` or `name` are skipped and reported.
/// Returns the issues found and the abouts that were written.
pub fn generate(
    location: &Path,
    output: &Path,
    opts: &GenOptions<'_>,
) -> anyhow::Result<(Vec<Issue>, Vec<About>)> {
    let rows = match load_inventory(location) {
        Ok(rows) => rows,
        Err(e) => return Ok((vec![Issue::critical(e.to_string())], vec![])),
    };

    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();
    let mut abouts = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row = match opts.mapping {
            Some(mapping) => apply_mapping(row, mapping),
            None => row,
        };
        let raw_path = row_value(&row, ABOUT_FILE_PATH_ATTR).unwrap_or_default().to_string();
        if raw_path.is_empty() {
            issues.push(Issue::critical(format!(
                "Row {}: Field about_file_path is required and empty",
                index + 1
            )));
            continue;
        }
        let Some(rel) = about_file_rel(&raw_path) else {
            issues.push(Issue::critical(format!(
                "Row {}: Field about_file_path: {:?} is not a path inside the output directory",
                index + 1,
                raw_path
            )));
            continue;
        };
        if !seen.insert(rel.clone()) {
            issues.push(Issue::critical(format!(
                "The input has duplicated values in '{}' field: {}",
                ABOUT_FILE_PATH_ATTR, raw_path
            )));
            continue;
        }

        let target = output.join(&rel);
        let base_dir = target.parent().unwrap_or(output).to_path_buf();

        let mut fields: Vec<(String, String)> = row
            .into_iter()
            .filter(|(k, v)| {
                let k = k.trim();
                !k.eq_ignore_ascii_case(ABOUT_FILE_PATH_ATTR)
                    && !(k.eq_ignore_ascii_case("about_resource") && v.trim().is_empty())
            })
            .collect();
        if !fields
            .iter()
            .any(|(k, _)| k.trim().eq_ignore_ascii_case("about_resource"))
        {
            fields.push(("about_resource".to_string(), default_about_resource(&raw_path)));
        }

        let (about, about_issues) =
            About::from_fields(&rel, &base_dir, fields, Validation { check_paths: false });
        issues.extend(
            about_issues
                .into_iter()
                .map(|i| Issue::new(i.severity, format!("/{}: {}", rel, i.message))),
        );
        if about.name().is_empty() {
            continue;
        }
        abouts.push(about);
    }

    if let Some(source) = opts.license_source {
        let (licenses, license_issues) = fetch_license_texts(&abouts, source);
        issues.extend(license_issues);
        for about in abouts.iter_mut() {
            apply_licenses(about, &licenses)?;
        }
    }

    for about in &abouts {
        let written = about.dump(output)?;
        tracing::debug!(path = %written.display(), "ABOUT file written");
    }
    tracing::info!(
        location = %location.display(),
        output = %output.display(),
        generated = abouts.len(),
        "generation finished"
    );
    Ok((unique_issues(issues), abouts))
}

/// Fill the license fields of an About from fetched license details and
/// write `<key>.LICENSE` next to it. Abouts that already name a license file
/// are left alone.
fn apply_licenses(about: &mut About, licenses: &BTreeMap<String, LicenseInfo>) -> anyhow::Result<()> {
    if about.has("license_file") {
        return Ok(());
    }
    let Some(expression) = about.get("license_expression") else {
        return Ok(());
    };
    let (_, keys) = parse_license_expression(expression);
    let found: Vec<&LicenseInfo> = keys.iter().filter_map(|k| licenses.get(k)).collect();
    if found.is_empty() {
        return Ok(());
    }

    std::fs::create_dir_all(&about.base_dir)?;
    let mut files = Vec::with_capacity(found.len());
    for info in &found {
        let file = format!("{}{}", info.key, LICENSE_EXTENSION);
        std::fs::write(about.base_dir.join(&file), &info.text)?;
        files.push(file);
    }
    let keys: Vec<&str> = found.iter().map(|i| i.key.as_str()).collect();
    let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
    let urls: Vec<&str> = found.iter().map(|i| i.url.as_str()).collect();
    about.set("license_key", keys.join("\n"));
    about.set("license_name", names.join("\n"));
    about.set("license_url", urls.join("\n"));
    about.set("license_file", files.join("\n"));
    Ok(())
}
