use crate::about::{field_names, is_about_file, mapping_to_fields, About};
use crate::domain::constants::{ABOUT_FILE_PATH_ATTR, LICENSE_GROUP};
use crate::domain::models::{unique_issues, Issue};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One inventory row: `(column, value)` in file order.
pub type Row = Vec<(String, String)>;

#[derive(thiserror::Error, Debug)]
pub enum InventoryFileError {
    #[error("cannot read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("invalid CSV in {0}: {1}")]
    Csv(String, csv::Error),
    #[error("invalid JSON in {0}: {1}")]
    Json(String, serde_json::Error),
    #[error("{0}: expected a JSON object or an array of objects")]
    Shape(String),
    #[error("{0}: only .csv and .json inventories are supported")]
    Unsupported(String),
}

fn to_posix(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// ABOUT files at `location`: the file itself, or every ABOUT file below a
/// directory, sorted by path. Paired with their inventory-relative path.
pub fn about_locations(location: &Path) -> (Vec<(PathBuf, String)>, Vec<Issue>) {
    let mut found = Vec::new();
    let mut issues = Vec::new();
    if location.is_file() {
        if is_about_file(location) {
            let rel = location
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            found.push((location.to_path_buf(), rel));
        }
        return (found, issues);
    }

    for entry in WalkDir::new(location).follow_links(false).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if !entry.file_type().is_file() || !is_about_file(path) {
                    continue;
                }
                let rel = path.strip_prefix(location).unwrap_or(path);
                found.push((path.to_path_buf(), to_posix(rel)));
            }
            Err(e) => issues.push(Issue::error(format!(
                "Cannot walk {}: {}",
                location.display(),
                e
            ))),
        }
    }
    (found, issues)
}

/// Two ABOUT paths differing only by case clash on case-insensitive filesystems.
pub fn check_file_names(paths: &[String]) -> Vec<Issue> {
    let mut seen: BTreeMap<String, &String> = BTreeMap::new();
    let mut issues = Vec::new();
    for p in paths {
        if let Some(first) = seen.insert(p.to_lowercase(), p) {
            issues.push(Issue::critical(format!(
                "Duplicated filename in the same directory detected: {} and {}",
                first, p
            )));
        }
    }
    issues
}

/// Load every ABOUT file at `location`. Each file's issues are prefixed with
/// its relative path; repeated issues are reported once.
pub fn collect_inventory(location: &Path) -> (Vec<Issue>, Vec<About>) {
    let (locations, mut issues) = about_locations(location);
    let rel_paths: Vec<String> = locations.iter().map(|(_, rel)| rel.clone()).collect();
    issues.extend(check_file_names(&rel_paths));

    let mut abouts = Vec::with_capacity(locations.len());
    for (path, rel) in locations {
        let (about, about_issues) = About::load(&path, &rel);
        issues.extend(
            about_issues
                .into_iter()
                .map(|i| Issue::new(i.severity, format!("{}: {}", rel, i.message))),
        );
        abouts.push(about);
    }
    tracing::info!(location = %location.display(), abouts = abouts.len(), "inventory collected");
    (unique_issues(issues), abouts)
}

fn display_path(about: &About) -> String {
    if about.about_file_path.starts_with('/') {
        about.about_file_path.clone()
    } else {
        format!("/{}", about.about_file_path)
    }
}

/// Write the inventory as CSV or JSON. Rows that cannot be written are
/// skipped and reported.
pub fn write_output(abouts: &[About], output: &Path, format: &str) -> anyhow::Result<Vec<Issue>> {
    if format == "json" {
        save_as_json(abouts, output)
    } else {
        save_as_csv(abouts, output)
    }
}

fn save_as_csv(abouts: &[About], output: &Path) -> anyhow::Result<Vec<Issue>> {
    let names = field_names(abouts);
    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(&names)?;
    let mut issues = Vec::new();
    for about in abouts {
        let record: Vec<String> = names
            .iter()
            .map(|n| {
                if n == ABOUT_FILE_PATH_ATTR {
                    display_path(about)
                } else {
                    about.get(n).unwrap_or_default().to_string()
                }
            })
            .collect();
        if let Err(e) = writer.write_record(&record) {
            issues.push(Issue::critical(format!(
                "Generation skipped for {} : {}",
                display_path(about),
                e
            )));
        }
    }
    writer.flush()?;
    Ok(issues)
}

/// JSON view of one About: flat fields plus a `licenses` array.
pub fn about_to_json(about: &About) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert(
        ABOUT_FILE_PATH_ATTR.to_string(),
        serde_json::Value::String(display_path(about)),
    );
    for (name, value) in &about.fields {
        if LICENSE_GROUP.iter().any(|(f, _)| *f == name.as_str()) {
            continue;
        }
        obj.insert(name.clone(), serde_json::Value::String(value.clone()));
    }

    let columns: Vec<Vec<&str>> = LICENSE_GROUP.iter().map(|(f, _)| about.lines(f)).collect();
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    if rows > 0 {
        let licenses: Vec<serde_json::Value> = (0..rows)
            .map(|i| {
                let mut lic = serde_json::Map::new();
                for ((_, short), col) in LICENSE_GROUP.iter().zip(&columns) {
                    if let Some(v) = col.get(i) {
                        lic.insert(short.to_string(), serde_json::Value::String(v.to_string()));
                    }
                }
                serde_json::Value::Object(lic)
            })
            .collect();
        obj.insert("licenses".to_string(), serde_json::Value::Array(licenses));
    }
    serde_json::Value::Object(obj)
}

fn save_as_json(abouts: &[About], output: &Path) -> anyhow::Result<Vec<Issue>> {
    let data: Vec<serde_json::Value> = abouts.iter().map(about_to_json).collect();
    std::fs::write(output, serde_json::to_string_pretty(&data)?)?;
    Ok(vec![])
}

/// Read a CSV (header row) or JSON inventory into rows.
pub fn load_inventory(location: &Path) -> Result<Vec<Row>, InventoryFileError> {
    let shown = location.display().to_string();
    let lower = shown.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        load_csv(location, &shown)
    } else if lower.ends_with(".json") {
        load_json(location, &shown)
    } else {
        Err(InventoryFileError::Unsupported(shown))
    }
}

fn load_csv(location: &Path, shown: &str) -> Result<Vec<Row>, InventoryFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(location)
        .map_err(|e| InventoryFileError::Csv(shown.to_string(), e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| InventoryFileError::Csv(shown.to_string(), e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InventoryFileError::Csv(shown.to_string(), e))?;
        rows.push(
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect(),
        );
    }
    Ok(rows)
}

fn load_json(location: &Path, shown: &str) -> Result<Vec<Row>, InventoryFileError> {
    let raw = std::fs::read_to_string(location)
        .map_err(|e| InventoryFileError::Io(shown.to_string(), e))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| InventoryFileError::Json(shown.to_string(), e))?;
    let objects = match value {
        serde_json::Value::Array(items) => items,
        obj @ serde_json::Value::Object(_) => vec![obj],
        _ => return Err(InventoryFileError::Shape(shown.to_string())),
    };
    let mut rows = Vec::with_capacity(objects.len());
    for obj in objects {
        let yaml = serde_yaml::to_value(&obj)
            .map_err(|_| InventoryFileError::Shape(shown.to_string()))?;
        let serde_yaml::Value::Mapping(map) = yaml else {
            return Err(InventoryFileError::Shape(shown.to_string()));
        };
        rows.push(mapping_to_fields(&map));
    }
    Ok(rows)
}

pub fn row_value<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(column))
        .map(|(_, v)| v.trim())
}

/// The `about_file_path` values listed in an inventory file, without the
/// leading `/`.
pub fn load_about_paths(location: &Path) -> Result<Vec<String>, InventoryFileError> {
    Ok(load_inventory(location)?
        .iter()
        .filter_map(|row| row_value(row, ABOUT_FILE_PATH_ATTR))
        .map(|p| p.trim_start_matches('/').to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

/// Keep only abouts listed in the inventory at `location`; every listed path
/// without a matching ABOUT file is reported.
pub fn filter_by_inventory(abouts: &[About], location: &Path) -> (Vec<About>, Vec<Issue>) {
    let wanted = match load_about_paths(location) {
        Ok(p) => p,
        Err(e) => return (vec![], vec![Issue::critical(e.to_string())]),
    };
    let mut issues = Vec::new();
    let mut kept = Vec::new();
    for path in &wanted {
        match abouts
            .iter()
            .find(|a| a.about_file_path.trim_start_matches('/') == path)
        {
            Some(a) => {
                if !kept.contains(a) {
                    kept.push(a.clone());
                }
            }
            None => issues.push(Issue::error(format!(
                "The about_file_path '/{}' is not found in the location.",
                path
            ))),
        }
    }
    (kept, issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let lib = tmp.path().join("lib");
        fs::create_dir_all(&lib).unwrap();
        fs::write(lib.join("zlib.c"), "").unwrap();
        fs::write(
            lib.join("zlib.c.ABOUT"),
            "about_resource: zlib.c\nname: zlib\nversion: '1.2'\nlicense_expression: zlib\nlicenses:\n  - key: zlib\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("app.ABOUT"),
            "about_resource: .\nname: app\nteam: core\n",
        )
        .unwrap();
        fs::write(tmp.path().join("README"), "not an about file").unwrap();
        tmp
    }

    #[test]
    fn collects_abouts_with_relative_paths_and_prefixed_issues() {
        let tmp = tree();
        let (issues, abouts) = collect_inventory(tmp.path());
        let paths: Vec<_> = abouts.iter().map(|a| a.about_file_path.as_str()).collect();
        assert_eq!(paths, vec!["app.ABOUT", "lib/zlib.c.ABOUT"]);
        assert_eq!(
            issues,
            vec![Issue::info("app.ABOUT: Field team is a custom field.")]
        );
    }

    #[test]
    fn single_about_file_location() {
        let tmp = tree();
        let (_, abouts) = collect_inventory(&tmp.path().join("lib/zlib.c.ABOUT"));
        assert_eq!(abouts.len(), 1);
        assert_eq!(abouts[0].about_file_path, "zlib.c.ABOUT");
    }

    #[test]
    fn case_clashing_names_are_critical() {
        let issues = check_file_names(&["a/X.ABOUT".to_string(), "a/x.ABOUT".to_string()]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn csv_output_has_leading_slash_and_sorted_customs() {
        let tmp = tree();
        let (_, abouts) = collect_inventory(tmp.path());
        let out = tmp.path().join("inv.csv");
        let issues = write_output(&abouts, &out, "csv").unwrap();
        assert!(issues.is_empty());

        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "about_file_path,about_resource,name,version,license_expression,license_key,team"
        );
        assert_eq!(lines.next().unwrap(), "/app.ABOUT,.,app,,,,core");
        assert_eq!(lines.next().unwrap(), "/lib/zlib.c.ABOUT,zlib.c,zlib,1.2,zlib,zlib,");
    }

    #[test]
    fn json_output_groups_licenses() {
        let tmp = tree();
        let (_, abouts) = collect_inventory(tmp.path());
        let out = tmp.path().join("inv.json");
        write_output(&abouts, &out, "json").unwrap();

        let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        let items = v.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["about_file_path"], "/lib/zlib.c.ABOUT");
        assert_eq!(items[1]["licenses"][0]["key"], "zlib");
        assert!(items[1].get("license_key").is_none());
    }

    #[test]
    fn csv_inventory_round_trips_into_rows() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("inv.csv");
        fs::write(&p, "\u{feff}about_file_path,name\n/a.ABOUT,a\n/b.ABOUT,b\n").unwrap();
        let rows = load_inventory(&p).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(row_value(&rows[0], "about_file_path"), Some("/a.ABOUT"));
        assert_eq!(row_value(&rows[1], "NAME"), Some("b"));
    }

    #[test]
    fn json_inventory_accepts_single_object_and_licenses() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("inv.json");
        fs::write(
            &p,
            r#"{"about_file_path": "/a.ABOUT", "name": "a", "licenses": [{"key": "mit"}, {"key": "gpl-2.0"}]}"#,
        )
        .unwrap();
        let rows = load_inventory(&p).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(row_value(&rows[0], "license_key"), Some("mit\ngpl-2.0"));
    }

    #[test]
    fn unsupported_inventory_extension_is_rejected() {
        let err = load_inventory(Path::new("inv.txt")).unwrap_err();
        assert!(matches!(err, InventoryFileError::Unsupported(_)));
    }

    #[test]
    fn inventory_filter_reports_unmatched_paths() {
        let tmp = tree();
        let (_, abouts) = collect_inventory(tmp.path());
        let inv = tmp.path().join("subset.csv");
        fs::write(&inv, "about_file_path\n/app.ABOUT\n/missing.ABOUT\n").unwrap();

        let (kept, issues) = filter_by_inventory(&abouts, &inv);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "app");
        assert_eq!(
            issues,
            vec![Issue::error(
                "The about_file_path '/missing.ABOUT' is not found in the location."
            )]
        );
    }
}
