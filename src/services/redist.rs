use crate::about::About;
use crate::domain::models::Issue;
use crate::services::inventory::filter_by_inventory;
use std::path::Path;

/// Copy what may be redistributed into `output`: for each About flagged
/// `redistribute`, its `about_resource`, the ABOUT file itself and its license
/// and notice files, at the same path relative to `root`.
///
/// Returns the issues found and how many components were copied.
pub fn collect_redistributable(
    abouts: &[About],
    root: &Path,
    output: &Path,
    inventory_location: Option<&Path>,
) -> anyhow::Result<(Vec<Issue>, usize)> {
    let mut issues = Vec::new();
    let selected = match inventory_location {
        Some(inventory) => {
            let (kept, missing) = filter_by_inventory(abouts, inventory);
            issues.extend(missing);
            kept
        }
        None => abouts.to_vec(),
    };

    std::fs::create_dir_all(output)?;
    let mut copied = 0usize;
    for about in selected.iter().filter(|a| a.flag("redistribute") == Some(true)) {
        let rel_dir = about.base_dir.strip_prefix(root).unwrap_or(Path::new(""));
        let dst_dir = output.join(rel_dir);
        std::fs::create_dir_all(&dst_dir)?;

        for resource in about.lines("about_resource") {
            let src = about.resolve(resource);
            if !src.exists() {
                issues.push(Issue::error(format!(
                    "{}: about_resource {} not found. Nothing to redistribute.",
                    about.about_file_path,
                    src.display()
                )));
                continue;
            }
            let dst = match src.strip_prefix(&about.base_dir) {
                Ok(rel) => dst_dir.join(rel),
                Err(_) => dst_dir.clone(),
            };
            if src.is_dir() {
                copy_dir_all(&src, &dst, output)?;
            } else {
                copy_file(&src, &dst)?;
            }
        }

        let about_name = about
            .about_file_path
            .rsplit('/')
            .next()
            .unwrap_or_default();
        copy_file(&about.base_dir.join(about_name), &dst_dir.join(about_name))?;
        for field in ["license_file", "notice_file"] {
            for file in about.lines(field) {
                let src = about.resolve(file);
                if src.is_file() {
                    copy_file(&src, &dst_dir.join(file))?;
                }
            }
        }
        tracing::debug!(about = %about.about_file_path, "redistributable copied");
        copied += 1;
    }
    tracing::info!(output = %output.display(), copied, "redistribution collected");
    Ok((issues, copied))
}

fn copy_file(src: &Path, dst: &Path) -> anyhow::Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)?;
    Ok(())
}

/// Recursive copy that merges into an existing `dst` and never descends into
/// `skip` (the output tree, when it lives inside the source).
fn copy_dir_all(src: &Path, dst: &Path, skip: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        if path == skip {
            continue;
        }
        let ty = entry.file_type()?;
        let to = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_all(&path, &to, skip)?;
        } else if ty.is_file() {
            std::fs::copy(&path, to)?;
        }
    }
    Ok(())
}
