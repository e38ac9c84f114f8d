use crate::domain::constants::{
    ABOUT_EXTENSION, ABOUT_FILE_PATH_ATTR, FALSE_FLAGS, FILE_FIELDS, FLAG_FIELDS, LICENSE_GROUP,
    REQUIRED_FIELDS, STANDARD_FIELDS, TRUE_FLAGS,
};
use crate::domain::models::Issue;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

/// One parsed ABOUT record.
///
/// Field values are kept as text; multi-valued fields (license keys, license
/// files, ...) hold one value per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct About {
    /// Path of the ABOUT file relative to the inventory root, posix separators.
    pub about_file_path: String,
    /// Directory the ABOUT file was loaded from; relative paths resolve here.
    pub base_dir: PathBuf,
    pub fields: BTreeMap<String, String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AboutError {
    #[error("cannot read {0}: {1}")]
    Read(String, std::io::Error),
    #[error("invalid YAML in {0}: {1}")]
    Yaml(String, serde_yaml::Error),
    #[error("{0} is not a field mapping")]
    NotAMapping(String),
    #[error("invalid flag value: {0:?}")]
    InvalidFlag(String),
}

/// What `About::from_fields` checks beyond field shape.
#[derive(Clone, Copy, Debug)]
pub struct Validation {
    /// Resolve file fields against `base_dir` and report missing ones.
    pub check_paths: bool,
}

pub fn is_about_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            n.len() > ABOUT_EXTENSION.len()
                && n.to_ascii_uppercase().ends_with(ABOUT_EXTENSION)
        })
        .unwrap_or(false)
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_standard_field(name: &str) -> bool {
    STANDARD_FIELDS.contains(&name)
}

/// `Some(true)`/`Some(false)` for a known flag, `None` for empty.
pub fn parse_flag(raw: &str) -> Result<Option<bool>, AboutError> {
    let v = raw.trim().to_ascii_lowercase();
    if v.is_empty() {
        Ok(None)
    } else if TRUE_FLAGS.contains(&v.as_str()) {
        Ok(Some(true))
    } else if FALSE_FLAGS.contains(&v.as_str()) {
        Ok(Some(false))
    } else {
        Err(AboutError::InvalidFlag(raw.to_string()))
    }
}

/// Trim trailing spaces on each line, then the whole value.
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Render a YAML (or JSON-converted) value as field text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Mapping(_) | Value::Tagged(_) => serde_yaml::to_string(value)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Split a `licenses` list of `{key, name, file, url}` entries into the flat
/// `license_*` fields.
pub fn ungroup_licenses(value: &Value) -> Vec<(String, String)> {
    let mut columns: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    if let Value::Sequence(entries) = value {
        for entry in entries {
            let Value::Mapping(m) = entry else { continue };
            for (field, short) in LICENSE_GROUP {
                if let Some(v) = m.get(short) {
                    let text = value_to_text(v);
                    if !text.is_empty() {
                        columns.entry(field).or_default().push(text);
                    }
                }
            }
        }
    }
    LICENSE_GROUP
        .iter()
        .filter_map(|(field, _)| {
            columns
                .remove(field)
                .map(|vals| (field.to_string(), vals.join("\n")))
        })
        .collect()
}

/// Rename fields using an `about_field -> column` mapping. Column names are
/// matched case-insensitively since field names are lowercased on load.
pub fn apply_mapping(
    fields: Vec<(String, String)>,
    mapping: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let reverse: BTreeMap<String, &String> = mapping
        .iter()
        .map(|(about_field, column)| (column.trim().to_ascii_lowercase(), about_field))
        .collect();
    fields
        .into_iter()
        .map(|(name, value)| match reverse.get(&name.to_ascii_lowercase()) {
            Some(about_field) => (about_field.to_ascii_lowercase(), value),
            None => (name, value),
        })
        .collect()
}

/// Turn a YAML/JSON mapping into `(name, text)` pairs, expanding `licenses`.
pub fn mapping_to_fields(map: &Mapping) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for (k, v) in map {
        let name = value_to_text(k);
        if name.eq_ignore_ascii_case("licenses") {
            fields.extend(ungroup_licenses(v));
        } else {
            fields.push((name, value_to_text(v)));
        }
    }
    fields
}

impl About {
    /// Read and validate the ABOUT file at `location`.
    pub fn load(location: &Path, about_file_path: &str) -> (About, Vec<Issue>) {
        let base_dir = location
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        match read_mapping(location) {
            Ok(map) => About::from_fields(
                about_file_path,
                &base_dir,
                mapping_to_fields(&map),
                Validation { check_paths: true },
            ),
            Err(e) => {
                let about = About {
                    about_file_path: about_file_path.to_string(),
                    base_dir,
                    fields: BTreeMap::new(),
                };
                (
                    about,
                    vec![Issue::critical(format!("Cannot load invalid ABOUT file: {}", e))],
                )
            }
        }
    }

    /// Build an About from raw `(name, value)` pairs and validate it.
    pub fn from_fields(
        about_file_path: &str,
        base_dir: &Path,
        raw: Vec<(String, String)>,
        validation: Validation,
    ) -> (About, Vec<Issue>) {
        let mut issues = Vec::new();
        let mut fields = BTreeMap::new();
        let mut present = BTreeSet::new();
        let mut about_file_path = about_file_path.to_string();

        for (orig_name, value) in raw {
            let name = orig_name.trim().to_ascii_lowercase();
            if name == ABOUT_FILE_PATH_ATTR {
                if about_file_path.is_empty() {
                    about_file_path = value.trim().to_string();
                }
                continue;
            }
            if !is_valid_name(&name) {
                issues.push(Issue::critical(format!(
                    "Field name: {:?} contains illegal name characters: 0 to 9, a to z, A to Z and _.",
                    orig_name
                )));
                continue;
            }
            let value = normalize_text(&value);
            if !present.insert(name.clone()) {
                let previous = fields.get(&name).cloned().unwrap_or_default();
                if previous != value {
                    issues.push(Issue::warning(format!(
                        "Field {} is a duplicate. Original value: \"{}\" replaced with: \"{}\"",
                        orig_name, previous, value
                    )));
                }
                continue;
            }
            if !is_standard_field(&name) {
                issues.push(Issue::info(format!("Field {} is a custom field.", orig_name)));
            }
            if value.is_empty() {
                if REQUIRED_FIELDS.contains(&name.as_str()) {
                    issues.push(Issue::critical(format!("Field {} is required and empty", name)));
                } else {
                    issues.push(Issue::info(format!("Field {} is present but empty.", name)));
                }
                continue;
            }
            fields.insert(name, value);
        }

        for required in REQUIRED_FIELDS {
            if !present.contains(required) {
                issues.push(Issue::critical(format!("Field {} is required", required)));
            }
        }

        let about = About {
            about_file_path,
            base_dir: base_dir.to_path_buf(),
            fields,
        };
        issues.extend(about.check_flags());
        if validation.check_paths {
            issues.extend(about.check_paths());
        }
        (about, issues)
    }

    fn check_flags(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for flag in FLAG_FIELDS {
            if let Some(raw) = self.get(flag) {
                if parse_flag(raw).is_err() {
                    issues.push(Issue::error(format!(
                        "Path: {} - Field {}: Invalid flag value: {:?} is not one of: {}",
                        self.about_file_path,
                        flag,
                        raw,
                        TRUE_FLAGS
                            .iter()
                            .chain(FALSE_FLAGS.iter())
                            .copied()
                            .collect::<Vec<_>>()
                            .join(", ")
                    )));
                }
            }
        }
        issues
    }

    fn check_paths(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        for rel in self.lines("about_resource") {
            let location = self.resolve(rel);
            if !location.exists() {
                issues.push(Issue::info(format!(
                    "Field about_resource: Path {} not found",
                    location.display()
                )));
            }
        }
        for field in FILE_FIELDS {
            for rel in self.lines(field) {
                let location = self.resolve(rel);
                if !location.exists() {
                    issues.push(Issue::critical(format!(
                        "Field {}: Path {} not found",
                        field,
                        location.display()
                    )));
                }
            }
        }
        issues
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Non-empty lines of a multi-valued field.
    pub fn lines(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|v| v.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.get("name").unwrap_or_default()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| parse_flag(v).ok().flatten())
    }

    pub fn custom_field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys().filter(|k| !is_standard_field(k))
    }

    /// Path relative to the ABOUT file, with `.` / `/` meaning its directory.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        let trimmed = rel.trim().trim_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            self.base_dir.clone()
        } else {
            self.base_dir.join(trimmed)
        }
    }

    /// Read a text file referenced by a path field. `None` when unreadable.
    pub fn read_text(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.resolve(rel)).ok()
    }

    /// Serialize as ABOUT YAML: standard fields in canonical order, then custom
    /// fields by name, license fields regrouped under `licenses`.
    pub fn dumps(&self) -> anyhow::Result<String> {
        let mut out = Mapping::new();
        for name in STANDARD_FIELDS {
            if LICENSE_GROUP.iter().any(|(f, _)| *f == name) {
                continue;
            }
            if let Some(v) = self.get(name) {
                let v = if FLAG_FIELDS.contains(&name) {
                    match parse_flag(v) {
                        Ok(Some(true)) => "yes".to_string(),
                        Ok(Some(false)) => "no".to_string(),
                        _ => v.to_string(),
                    }
                } else {
                    v.to_string()
                };
                out.insert(Value::String(name.to_string()), Value::String(v));
            }
        }

        let columns: Vec<Vec<&str>> = LICENSE_GROUP.iter().map(|(f, _)| self.lines(f)).collect();
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        if rows > 0 {
            let mut licenses = Vec::new();
            for i in 0..rows {
                let mut entry = Mapping::new();
                for ((_, short), col) in LICENSE_GROUP.iter().zip(&columns) {
                    if let Some(v) = col.get(i) {
                        entry.insert(
                            Value::String(short.to_string()),
                            Value::String(v.to_string()),
                        );
                    }
                }
                licenses.push(Value::Mapping(entry));
            }
            out.insert(
                Value::String("licenses".to_string()),
                Value::Sequence(licenses),
            );
        }

        for name in self.custom_field_names() {
            if let Some(v) = self.get(name) {
                out.insert(Value::String(name.clone()), Value::String(v.to_string()));
            }
        }
        Ok(serde_yaml::to_string(&out)?)
    }

    /// Write the ABOUT file under `root` at `about_file_path`, creating parent
    /// directories. Returns the written location.
    pub fn dump(&self, root: &Path) -> anyhow::Result<PathBuf> {
        let Some(location) = about_location(root, &self.about_file_path) else {
            anyhow::bail!("invalid about_file_path: {:?}", self.about_file_path);
        };
        if let Some(parent) = location.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&location, self.dumps()?)?;
        Ok(location)
    }
}

/// Normalized ABOUT file path relative to an output root. A trailing `/`
/// names the directory itself, which gets an ABOUT file named after it.
///
/// `None` when nothing is left after the leading `/` or the path leaves the
/// root (`..`, `.`, drive prefixes).
pub fn about_file_rel(about_file_path: &str) -> Option<String> {
    let trimmed = about_file_path.trim().trim_start_matches('/');
    let mut rel = if trimmed.ends_with('/') {
        let dir = trimmed.trim_end_matches('/');
        let leaf = dir.rsplit('/').next().unwrap_or_default();
        format!("{}/{}", dir, leaf)
    } else {
        trimmed.to_string()
    };
    if rel.is_empty()
        || !Path::new(&rel)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    if !rel.to_ascii_uppercase().ends_with(ABOUT_EXTENSION) {
        rel.push_str(ABOUT_EXTENSION);
    }
    Some(rel)
}

/// Where an `about_file_path` lands under `root`.
pub fn about_location(root: &Path, about_file_path: &str) -> Option<PathBuf> {
    about_file_rel(about_file_path).map(|rel| root.join(rel))
}

/// Default `about_resource` for a generated ABOUT file.
pub fn default_about_resource(about_file_path: &str) -> String {
    let p = about_file_path.trim();
    if p.ends_with('/') {
        return ".".to_string();
    }
    let leaf = p.rsplit('/').next().unwrap_or(p);
    if leaf.to_ascii_uppercase().ends_with(ABOUT_EXTENSION) {
        leaf[..leaf.len() - ABOUT_EXTENSION.len()].to_string()
    } else {
        leaf.to_string()
    }
}

fn read_mapping(location: &Path) -> Result<Mapping, AboutError> {
    let shown = location.display().to_string();
    let raw = std::fs::read_to_string(location).map_err(|e| AboutError::Read(shown.clone(), e))?;
    let value: Value = serde_yaml::from_str(&raw).map_err(|e| AboutError::Yaml(shown.clone(), e))?;
    match value {
        Value::Mapping(m) => Ok(m),
        _ => Err(AboutError::NotAMapping(shown)),
    }
}

/// Column names for a set of abouts: `about_file_path`, the standard fields
/// used by any of them (required ones always) in canonical order, then custom
/// fields sorted by name.
pub fn field_names(abouts: &[About]) -> Vec<String> {
    let mut names = vec![ABOUT_FILE_PATH_ATTR.to_string()];
    for std_name in STANDARD_FIELDS {
        if REQUIRED_FIELDS.contains(&std_name) || abouts.iter().any(|a| a.has(std_name)) {
            names.push(std_name.to_string());
        }
    }
    let customs: BTreeSet<&String> = abouts.iter().flat_map(|a| a.custom_field_names()).collect();
    names.extend(customs.into_iter().cloned());
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Severity;
    use std::fs;
    use tempfile::TempDir;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn load_reads_fields_and_ungroups_licenses() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("zlib.c"), "int main;").unwrap();
        fs::write(tmp.path().join("zlib.LICENSE"), "zlib license text").unwrap();
        let loc = tmp.path().join("zlib.c.ABOUT");
        fs::write(
            &loc,
            "about_resource: zlib.c\nname: zlib\nversion: 1.2.11\nlicenses:\n  - key: zlib\n    name: ZLIB License\n    file: zlib.LICENSE\n",
        )
        .unwrap();

        let (about, issues) = About::load(&loc, "zlib.c.ABOUT");
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
        assert_eq!(about.name(), "zlib");
        assert_eq!(about.get("version"), Some("1.2.11"));
        assert_eq!(about.get("license_key"), Some("zlib"));
        assert_eq!(about.get("license_file"), Some("zlib.LICENSE"));
        assert_eq!(about.read_text("zlib.LICENSE").as_deref(), Some("zlib license text"));
    }

    #[test]
    fn load_reports_invalid_yaml_as_critical() {
        let tmp = TempDir::new().unwrap();
        let loc = tmp.path().join("bad.ABOUT");
        fs::write(&loc, "name: [unclosed\n").unwrap();
        let (_, issues) = About::load(&loc, "bad.ABOUT");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].message.starts_with("Cannot load invalid ABOUT file"));
    }

    #[test]
    fn missing_required_fields_are_critical() {
        let (_, issues) = About::from_fields(
            "a.ABOUT",
            Path::new("."),
            fields(&[("version", "1.0")]),
            Validation { check_paths: false },
        );
        let msgs: Vec<_> = issues.iter().map(|i| i.to_string()).collect();
        assert!(msgs.contains(&"CRITICAL: Field about_resource is required".to_string()));
        assert!(msgs.contains(&"CRITICAL: Field name is required".to_string()));
    }

    #[test]
    fn custom_and_illegal_fields_are_reported() {
        let (about, issues) = About::from_fields(
            "a.ABOUT",
            Path::new("."),
            fields(&[
                ("about_resource", "."),
                ("Name", "a"),
                ("team", "core"),
                ("bad-name", "x"),
            ]),
            Validation { check_paths: false },
        );
        assert_eq!(about.get("team"), Some("core"));
        assert!(!about.has("bad-name"));
        assert!(issues.contains(&Issue::info("Field team is a custom field.")));
        assert!(issues
            .iter()
            .any(|i| i.severity == Severity::Critical && i.message.contains("bad-name")));
    }

    #[test]
    fn invalid_flag_is_an_error() {
        let (about, issues) = About::from_fields(
            "a.ABOUT",
            Path::new("."),
            fields(&[("about_resource", "."), ("name", "a"), ("redistribute", "maybe")]),
            Validation { check_paths: false },
        );
        assert_eq!(about.flag("redistribute"), None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn missing_license_file_is_critical_but_resource_is_info() {
        let tmp = TempDir::new().unwrap();
        let (_, issues) = About::from_fields(
            "a.ABOUT",
            tmp.path(),
            fields(&[
                ("about_resource", "a.c"),
                ("name", "a"),
                ("license_file", "a.LICENSE"),
            ]),
            Validation { check_paths: true },
        );
        let severities: Vec<_> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Info, Severity::Critical]);
    }

    #[test]
    fn dumps_groups_licenses_and_orders_fields() {
        let (about, _) = About::from_fields(
            "lib/a.ABOUT",
            Path::new("."),
            fields(&[
                ("zeta", "custom"),
                ("name", "a"),
                ("about_resource", "a.c"),
                ("license_key", "mit\napache-2.0"),
                ("license_name", "MIT License"),
                ("redistribute", "Y"),
            ]),
            Validation { check_paths: false },
        );
        let text = about.dumps().unwrap();
        let name_pos = text.find("name: a").unwrap();
        let res_pos = text.find("about_resource: a.c").unwrap();
        let zeta_pos = text.find("zeta: custom").unwrap();
        assert!(res_pos < name_pos && name_pos < zeta_pos);

        let reparsed: Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(reparsed["redistribute"], "yes");
        let licenses = reparsed["licenses"].as_sequence().unwrap();
        assert_eq!(licenses.len(), 2);
        assert_eq!(licenses[0]["key"], "mit");
        assert_eq!(licenses[0]["name"], "MIT License");
        assert_eq!(licenses[1]["key"], "apache-2.0");
    }

    #[test]
    fn about_location_appends_extension_and_handles_directories() {
        let root = Path::new("/out");
        let at = |p: &str| about_location(root, p);
        assert_eq!(at("/lib/a.c"), Some(PathBuf::from("/out/lib/a.c.ABOUT")));
        assert_eq!(at("lib/a.ABOUT"), Some(PathBuf::from("/out/lib/a.ABOUT")));
        assert_eq!(at("/lib/pkg/"), Some(PathBuf::from("/out/lib/pkg/pkg.ABOUT")));
        assert_eq!(at("/pkg/"), Some(PathBuf::from("/out/pkg/pkg.ABOUT")));
        assert_eq!(default_about_resource("/lib/a.c.ABOUT"), "a.c");
        assert_eq!(default_about_resource("/lib/pkg/"), ".");
    }

    #[test]
    fn about_file_rel_rejects_paths_leaving_the_root() {
        for bad in ["/", "//", "", "../escaped.c", "/lib/../../x.c", "./a.c", "lib/../", "../"] {
            assert_eq!(about_file_rel(bad), None, "{:?} should be rejected", bad);
        }
        assert_eq!(about_file_rel("a.c").as_deref(), Some("a.c.ABOUT"));
        assert_eq!(about_file_rel("/a.c.ABOUT").as_deref(), Some("a.c.ABOUT"));
    }

    #[test]
    fn flags_accept_known_spellings_only() {
        assert_eq!(parse_flag(" Yes ").unwrap(), Some(true));
        assert_eq!(parse_flag("n").unwrap(), Some(false));
        assert_eq!(parse_flag("").unwrap(), None);
        assert!(matches!(parse_flag("maybe"), Err(AboutError::InvalidFlag(v)) if v == "maybe"));
    }

    #[test]
    fn mapping_renames_columns_to_about_fields() {
        let mut mapping = BTreeMap::new();
        mapping.insert("name".to_string(), "Component".to_string());
        let out = apply_mapping(fields(&[("component", "zlib"), ("version", "1")]), &mapping);
        assert_eq!(out, fields(&[("name", "zlib"), ("version", "1")]));
    }

    #[test]
    fn field_names_put_standard_before_sorted_custom() {
        let mk = |pairs: &[(&str, &str)]| {
            About::from_fields(
                "x.ABOUT",
                Path::new("."),
                fields(pairs),
                Validation { check_paths: false },
            )
            .0
        };
        let abouts = vec![
            mk(&[("name", "a"), ("about_resource", "."), ("zz", "1"), ("version", "1")]),
            mk(&[("name", "b"), ("about_resource", "."), ("aa", "1"), ("copyright", "c")]),
        ];
        assert_eq!(
            field_names(&abouts),
            vec![
                "about_file_path",
                "about_resource",
                "name",
                "version",
                "copyright",
                "aa",
                "zz"
            ]
        );
    }
}
