use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub fn is_zip(location: &Path) -> bool {
    location
        .to_string_lossy()
        .to_ascii_lowercase()
        .ends_with(".zip")
}

fn extraction_dir(archive: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(archive.to_string_lossy().as_bytes());
    let id = hex::encode(hasher.finalize());
    std::env::temp_dir()
        .join("about-code")
        .join(format!("{}-{}", &id[..16], std::process::id()))
}

/// Scratch directory holding an extracted archive. Removed on drop.
#[derive(Debug)]
pub struct Extracted {
    root: PathBuf,
}

impl Extracted {
    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for Extracted {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            tracing::warn!(path = %self.root.display(), error = %e, "cannot remove extracted archive");
        }
    }
}

/// Extract a zip of ABOUT files into a scratch directory.
/// Entries whose names escape the target (absolute paths, `..`) are skipped.
pub fn extract_zip(archive: &Path) -> anyhow::Result<Extracted> {
    let target = extraction_dir(archive);
    if target.exists() {
        std::fs::remove_dir_all(&target)?;
    }
    std::fs::create_dir_all(&target)?;
    let extracted = Extracted {
        root: target.clone(),
    };

    let file = std::fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "skipping unsafe zip entry");
            continue;
        };
        let out = target.join(rel);
        if entry.is_dir() {
            std::fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut f = std::fs::File::create(&out)?;
        std::io::copy(&mut entry, &mut f)?;
    }
    tracing::info!(archive = %archive.display(), target = %target.display(), "extracted zip input");
    Ok(extracted)
}
