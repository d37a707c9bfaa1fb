//! `cmoc platforms` — list the supported platforms.

use anyhow::{bail, Result};
use cmoc_targets::describe::{platforms_to_json, platforms_to_toml};
use cmoc_targets::supported_platforms;

/// Print the platform table in the requested format (default: text).
pub fn run(format: Option<&str>) -> Result<()> {
    match format.unwrap_or("text") {
        "text" => {
            println!("Supported platforms:");
            println!();
            for p in supported_platforms() {
                println!("  {:<8} {:<8} {} ({})", p.id, p.device, p.description, p.generation);
            }
        }
        "toml" => print!("{}", platforms_to_toml()?),
        "json" => println!("{}", platforms_to_json()?),
        other => bail!("unknown format '{other}' (expected text, toml, or json)"),
    }
    Ok(())
}
