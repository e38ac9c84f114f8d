use crate::about::About;
use crate::domain::models::Issue;
use std::path::{Path, PathBuf};

/// Map every `license_file` of every About to `(dir/<file>, <about dir>/<file>)`.
/// Files missing from `dir` are reported and left out.
pub fn verify_license_files(abouts: &[About], dir: &Path) -> (Vec<(PathBuf, PathBuf)>, Vec<Issue>) {
    let mut pairs = Vec::new();
    let mut issues = Vec::new();
    for about in abouts {
        for file in about.lines("license_file") {
            let src = dir.join(file);
            if src.is_file() {
                let pair = (src, about.resolve(file));
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            } else {
                let issue = Issue::error(format!(
                    "Field license_file: Path {} not found",
                    src.display()
                ));
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }
    }
    (pairs, issues)
}

pub fn copy_files(pairs: &[(PathBuf, PathBuf)]) -> anyhow::Result<()> {
    for (src, dst) in pairs {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(src, dst)?;
        tracing::debug!(from = %src.display(), to = %dst.display(), "license file copied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::about::Validation;
    use tempfile::TempDir;

    #[test]
    fn pairs_found_files_and_reports_missing_ones() {
        let texts = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::write(texts.path().join("mit.LICENSE"), "MIT text").unwrap();

        let (about, _) = About::from_fields(
            "lib/a.ABOUT",
            &out.path().join("lib"),
            vec![
                ("about_resource".to_string(), "a".to_string()),
                ("name".to_string(), "a".to_string()),
                ("license_file".to_string(), "mit.LICENSE\ngpl.LICENSE".to_string()),
            ],
            Validation { check_paths: false },
        );
        let (pairs, issues) = verify_license_files(&[about], texts.path());

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, out.path().join("lib/mit.LICENSE"));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.ends_with("gpl.LICENSE not found"));

        copy_files(&pairs).unwrap();
        let copied = std::fs::read_to_string(out.path().join("lib/mit.LICENSE")).unwrap();
        assert_eq!(copied, "MIT text");
    }
}
