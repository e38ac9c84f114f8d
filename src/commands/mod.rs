//! Command handler layer.
//!
//! Each `handle_*_commands` returns `Ok(false)` when the parsed command is not
//! its own, so `main` can chain them.
//!
//! ## Files
//! - `inventory.rs`: `inventory`.
//! - `gen.rs`: `gen`.
//! - `attrib.rs`: `attrib`.
//! - `redist.rs`: `redist`.
//! - `stubs.rs`: `export` / `fetch`.
//!
//! ## Principles
//! - Validate arguments here; a failed check prints `ERROR: ...` and returns
//!   without side effects.
//! - Delegate the work to `services/*` and report issues via `log_errors`.

pub mod attrib;
pub mod gen;
pub mod inventory;
pub mod redist;
pub mod stubs;

pub use attrib::handle_attrib_commands;
pub use gen::handle_gen_commands;
pub use inventory::handle_inventory_commands;
pub use redist::handle_redist_commands;
pub use stubs::handle_stub_commands;

use crate::services::archive::{extract_zip, is_zip, Extracted};
use crate::services::output::refuse;
use std::path::{Path, PathBuf};

/// Directory that receives `error.log` for an output file.
pub(crate) fn output_dir(output: &Path) -> PathBuf {
    output
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Refuse a required path that does not exist. Returns `true` when refused.
pub(crate) fn refuse_missing(path: &Path) -> bool {
    if path.exists() {
        return false;
    }
    let line = format!("ERROR: Path \"{}\" does not exist.", path.display());
    refuse(&[line.as_str()]);
    true
}

/// Refuse a path that must be an existing directory. Returns `true` when refused.
pub(crate) fn refuse_not_dir(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }
    let line = format!(
        "ERROR: Path \"{}\" is not an existing directory.",
        path.display()
    );
    refuse(&[line.as_str()]);
    true
}

/// ABOUT input location, extracting zip archives first. Keep the returned
/// guard alive while the location is in use.
pub(crate) fn input_location(location: &Path) -> anyhow::Result<(PathBuf, Option<Extracted>)> {
    if location.is_file() && is_zip(location) {
        let extracted = extract_zip(location)?;
        Ok((extracted.path().to_path_buf(), Some(extracted)))
    } else {
        Ok((location.to_path_buf(), None))
    }
}
