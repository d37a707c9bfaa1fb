//! `cmoc translate` — run the device compiler on a SPIR-V file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cmoc_backend::diagnostics::write_escaped_args;
use cmoc_backend::{translate_il, BridgeConfig, InputKind, OclocCommand, TranslationRequest};

/// Parsed `translate` arguments.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub platform: String,
    pub binary_format: String,
    pub input: PathBuf,
    pub features: String,
    pub llvm_options: Vec<String>,
    pub time_passes: bool,
    pub output: Option<PathBuf>,
    pub debug_info: Option<PathBuf>,
    pub dry_run: bool,
    pub json: bool,
}

impl TranslateOptions {
    fn kernel_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("gen"))
    }

    fn debug_info_path(&self) -> PathBuf {
        self.debug_info
            .clone()
            .unwrap_or_else(|| self.input.with_extension("dbg"))
    }
}

/// Run the translation and write its outputs.
pub fn run(opts: &TranslateOptions, config: &BridgeConfig) -> Result<()> {
    let ir = std::fs::read(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    let request = TranslationRequest {
        platform: &opts.platform,
        binary_format: &opts.binary_format,
        features: &opts.features,
        backend_options: &opts.llvm_options,
        ir: &ir,
        input_kind: InputKind::Spirv,
        time_passes: opts.time_passes,
    };

    if opts.dry_run {
        let command = OclocCommand::new(&request, config)?;
        let mut out = io::stdout().lock();
        write_escaped_args(&mut out, command.args(), '"')?;
        return Ok(());
    }

    let result = translate_il(&request, config)
        .with_context(|| format!("translating {}", opts.input.display()))?;

    let kernel_path = opts.kernel_path();
    write_file(&kernel_path, &result.kernel_binary)?;
    let debug_path = if result.has_debug_info() {
        let path = opts.debug_info_path();
        write_file(&path, &result.debug_info)?;
        Some(path)
    } else {
        None
    };

    if opts.json {
        let summary = serde_json::json!({
            "input": opts.input.display().to_string(),
            "platform": opts.platform,
            "binary-format": opts.binary_format,
            "kernel-binary": {
                "path": kernel_path.display().to_string(),
                "size": result.kernel_binary.len(),
                "sha256": result.kernel_digest(),
            },
            "debug-info": debug_path.as_ref().map(|p| serde_json::json!({
                "path": p.display().to_string(),
                "size": result.debug_info.len(),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Translated {} for {}", opts.input.display(), opts.platform);
        println!(
            "  kernel binary: {} ({} bytes, sha256 {})",
            kernel_path.display(),
            result.kernel_binary.len(),
            result.kernel_digest()
        );
        match &debug_path {
            Some(p) => println!(
                "  debug info:    {} ({} bytes)",
                p.display(),
                result.debug_info.len()
            ),
            None => println!("  debug info:    none"),
        }
    }

    Ok(())
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(data)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
