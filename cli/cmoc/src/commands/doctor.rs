//! `cmoc doctor` — device compiler diagnostics.

use anyhow::Result;
use cmoc_backend::config::{ENV_DEBUG, ENV_INTERNAL_OPTIONS, ENV_OCLOC_DIR, ENV_VC_API_OPTIONS};
use cmoc_backend::library::{library_path, FREE_OUTPUT_SYMBOL, INVOKE_SYMBOL};
use cmoc_backend::{BridgeConfig, LibOcloc};

/// Print the resolved configuration and try to load the compiler library.
pub fn run(config: &BridgeConfig) -> Result<()> {
    println!("=== cmoc doctor ===");
    println!();
    println!("cmoc version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Configuration ---");
    println!(
        "  {ENV_OCLOC_DIR:<22} {}",
        config
            .ocloc_dir
            .as_ref()
            .map_or("(default search path)".to_string(), |d| d.display().to_string())
    );
    println!(
        "  {ENV_VC_API_OPTIONS:<22} {}",
        config.vc_api_options.as_deref().unwrap_or("(unset)")
    );
    println!(
        "  {ENV_INTERNAL_OPTIONS:<22} {}",
        config.internal_options.as_deref().unwrap_or("(unset)")
    );
    println!("  {ENV_DEBUG:<22} {}", config.debug);
    println!();

    println!("--- Device Compiler ---");
    println!("  library: {}", library_path(config).display());
    match LibOcloc::load(config) {
        Ok(lib) => {
            println!("  loaded:  {}", lib.path().display());
            println!("  symbols: {INVOKE_SYMBOL}, {FREE_OUTPUT_SYMBOL}");
        }
        Err(e) => println!("  error:   {e}"),
    }

    Ok(())
}
