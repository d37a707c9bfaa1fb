//! Platform id translation.

use std::fmt;

use crate::error::{Result, TargetError};
use crate::platform::lookup;

/// Device family code understood by the device compiler (e.g., "tgllp").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceCode(String);

impl DeviceCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric stepping qualifier passed through `-revision_id`.
///
/// Empty means "no revision"; the flag is then left out of the command line.
/// Only numeric values are accepted by the device compiler, never letter
/// steppings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u32> for RevisionId {
    fn from(id: u32) -> Self {
        RevisionId(id.to_string())
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Translate a frontend platform id into the device compiler's device code.
///
/// An unmapped id is a contract violation: the frontend only accepts
/// platforms from the same table.
pub fn translate_cpu(platform: &str) -> Result<DeviceCode> {
    lookup(platform)
        .map(|p| DeviceCode(p.device.to_string()))
        .ok_or_else(|| TargetError::UnmappedPlatform {
            platform: platform.to_string(),
        })
}

/// Translate a platform id into a revision id.
///
/// Always empty. The device compiler takes numeric revision ids from the
/// driver's enumeration, and there is no stepping to revision mapping yet.
// TODO: map stepping letters (A0, B0) to driver revision ids once the frontend passes a stepping.
pub fn translate_stepping(_platform: &str) -> RevisionId {
    RevisionId::default()
}
