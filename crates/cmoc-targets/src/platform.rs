//! Supported platform table.
//!
//! The set of platforms is fixed at build time. The frontend validates the
//! requested platform against the same list, so a miss here means the two
//! tables went out of sync.

use serde::Serialize;

/// A platform the backend can compile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DevicePlatform {
    /// Platform id as spelled by the frontend (e.g., "SKL").
    pub id: &'static str,
    /// Device code accepted by the device compiler's `-device` flag.
    pub device: &'static str,
    /// Human-readable product name.
    pub description: &'static str,
    /// Graphics generation.
    pub generation: &'static str,
}

// Declaration order is the listing order.
static PLATFORMS: &[DevicePlatform] = &[
    DevicePlatform {
        id: "SKL",
        device: "skl",
        description: "Skylake",
        generation: "Gen9",
    },
    DevicePlatform {
        id: "ICLLP",
        device: "icllp",
        description: "Ice Lake LP",
        generation: "Gen11",
    },
    DevicePlatform {
        id: "TGLLP",
        device: "tgllp",
        description: "Tiger Lake LP",
        generation: "Gen12",
    },
];

/// All supported platforms in declaration order.
pub fn supported_platforms() -> &'static [DevicePlatform] {
    PLATFORMS
}

/// Look up a platform by its exact (case-sensitive) id.
pub fn lookup(id: &str) -> Option<&'static DevicePlatform> {
    PLATFORMS.iter().find(|p| p.id == id)
}
