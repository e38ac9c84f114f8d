//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `inventory.rs`: ABOUT file discovery/loading + CSV/JSON inventory I/O.
//! - `gen.rs`: ABOUT file generation from an inventory.
//! - `license_api.rs`: license library client + license expression parsing.
//! - `license_files.rs`: license text verification/copying for `gen`.
//! - `attrib.rs`: attribution document rendering.
//! - `redist.rs`: redistributable file collection.
//! - `archive.rs`: zip input extraction.
//! - `error_log.rs`: severity-filtered console output + `error.log`.
//! - `settings.rs`: optional TOML settings file.
//! - `output.rs`: console banner/refusal helpers.
//!
//! ## Conventions
//! - Domain findings are returned as `Issue` values, never raised.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod archive;
pub mod attrib;
pub mod error_log;
pub mod gen;
pub mod inventory;
pub mod license_api;
pub mod license_files;
pub mod output;
pub mod redist;
pub mod settings;
