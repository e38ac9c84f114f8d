//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep severity/issue/config types in one place.
//! - Avoid cyclic imports between `commands/*` and `services/*`.
//! - Make output format changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs`: severity scale, issue records, run configuration.
//! - `constants.rs`: stable names (log file, field lists, messages).
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! The JSON inventory layout is pinned by `docs/contracts/inventory.schema.json`.

pub mod constants;
pub mod models;
