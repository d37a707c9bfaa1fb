//! TOML and JSON rendering of the platform table.

use serde::Serialize;

use crate::error::Result;
use crate::platform::{supported_platforms, DevicePlatform};

#[derive(Serialize)]
struct PlatformTable<'a> {
    platforms: &'a [DevicePlatform],
}

/// Serialize the platform table to pretty TOML (`[[platforms]]` entries).
pub fn platforms_to_toml() -> Result<String> {
    let table = PlatformTable {
        platforms: supported_platforms(),
    };
    Ok(toml::to_string_pretty(&table)?)
}

/// Serialize the platform table to pretty JSON.
pub fn platforms_to_json() -> Result<String> {
    let table = PlatformTable {
        platforms: supported_platforms(),
    };
    Ok(serde_json::to_string_pretty(&table)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_lists_every_platform() {
        let s = platforms_to_toml().unwrap();
        assert_eq!(s.matches("[[platforms]]").count(), supported_platforms().len());
        assert!(s.contains("device = \"tgllp\""));
    }

    #[test]
    fn json_lists_every_platform() {
        let s = platforms_to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        let list = v["platforms"].as_array().unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0]["id"], "SKL");
        assert_eq!(list[0]["device"], "skl");
    }
}
