//! Platform to device-code mapping for the CM offline compiler backend.
//!
//! The frontend names hardware by an abstract platform id (e.g. `"TGLLP"`).
//! The vendor device compiler wants its own lowercase device code and,
//! optionally, a numeric revision id. This crate owns that translation.
//!
//! ## Modules
//!
//! - [`platform`] — The static table of supported platforms
//! - [`translate`] — Platform id → device code / revision id
//! - [`describe`] — TOML and JSON rendering of the table
//! - [`error`] — Error types

pub mod describe;
pub mod error;
pub mod platform;
pub mod translate;

pub use error::TargetError;
pub use platform::{lookup, supported_platforms, DevicePlatform};
pub use translate::{translate_cpu, translate_stepping, DeviceCode, RevisionId};
