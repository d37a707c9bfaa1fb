//! The `translate_il` entry point.
//!
//! One call is one scoped use of the device compiler: compose options,
//! translate the platform, load the library, run `oclocInvoke`, copy the
//! outputs, release them, unload the library.

use std::ffi::CString;
use std::io::{self, Write};
use std::os::raw::c_char;
use std::ptr;

use cmoc_targets::{translate_cpu, translate_stepping, DeviceCode, RevisionId};
use log::debug;

use crate::config::BridgeConfig;
use crate::diagnostics;
use crate::error::{BackendError, Result};
use crate::library::{EntryPoints, LibOcloc, INVOKE_SYMBOL};
use crate::options::{compose_internal_options, compose_options};
use crate::output::{extract_outputs, CompilerOutputs, ILTranslationResult};

/// Virtual file name of the IR buffer. The compiler only uses it as a label.
pub const SOURCE_NAME: &str = "cmoc_spirv";
const SOURCE_NAME_C: &[u8] = b"cmoc_spirv\0";

/// Kind of IR handed to the device compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum InputKind {
    #[default]
    Spirv,
}

impl InputKind {
    /// Command-line flag selecting this input kind.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Spirv => "-spirv_input",
        }
    }
}

/// One translation request from the compiler driver.
#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    /// Frontend platform id (e.g., "TGLLP").
    pub platform: &'a str,
    /// Value of `-binary-format` (e.g., "cm", "ze").
    pub binary_format: &'a str,
    /// Target features; empty for none.
    pub features: &'a str,
    /// Options forwarded to the backend through `-llvm-options`.
    pub backend_options: &'a [String],
    /// The IR bytes. Borrowed for the duration of the call.
    pub ir: &'a [u8],
    pub input_kind: InputKind,
    /// Ask the compiler for a pass timing report.
    pub time_passes: bool,
}

/// A fully composed device compiler command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OclocCommand {
    args: Vec<String>,
    options: String,
    internal_options: String,
}

impl OclocCommand {
    /// Compose options and translate the platform for `request`.
    ///
    /// In debug mode the request and the composed command line are echoed to
    /// stderr.
    pub fn new(request: &TranslationRequest<'_>, config: &BridgeConfig) -> Result<Self> {
        Self::with_echo(request, config, &mut io::stderr().lock())
    }

    /// Like [`OclocCommand::new`], echoing to `echo` instead of stderr.
    pub fn with_echo<W: Write>(
        request: &TranslationRequest<'_>,
        config: &BridgeConfig,
        echo: &mut W,
    ) -> Result<Self> {
        if config.debug {
            diagnostics::echo(echo, "requested platform for translateIL", request.platform);
            diagnostics::echo(echo, "requested runtime for translateIL", request.binary_format);
        }

        let options = compose_options(config);
        let internal_options = compose_internal_options(
            config,
            request.binary_format,
            request.backend_options,
            request.features,
            request.time_passes,
        );

        if config.debug {
            diagnostics::echo(echo, "IGC Translation Options", &options);
            diagnostics::echo(echo, "IGC Translation Internal", &internal_options);
        }

        let device = translate_cpu(request.platform)?;
        let revision = translate_stepping(request.platform);

        let args = build_args(
            &device,
            &revision,
            request.input_kind,
            &options,
            &internal_options,
            !config.debug,
        );
        if config.debug {
            diagnostics::echo_args(echo, "oclocInvoke options", &args);
        }

        Ok(Self {
            args,
            options,
            internal_options,
        })
    }

    /// The argument vector passed to `oclocInvoke`.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn options(&self) -> &str {
        &self.options
    }

    pub fn internal_options(&self) -> &str {
        &self.internal_options
    }

    /// Run the command through `entry` with `ir` as the single source.
    ///
    /// The outputs are released exactly once before this returns, whether
    /// or not extraction succeeded.
    pub fn run(&self, entry: &EntryPoints, ir: &[u8]) -> Result<ILTranslationResult> {
        let c_args = self
            .args
            .iter()
            .map(|a| {
                CString::new(a.as_str()).map_err(|_| BackendError::ContractViolation {
                    detail: format!("argument contains a NUL byte: {a:?}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let argv: Vec<*const c_char> = c_args.iter().map(|a| a.as_ptr()).collect();
        let argc = u32::try_from(argv.len()).map_err(|_| BackendError::ContractViolation {
            detail: format!("too many arguments ({})", argv.len()),
        })?;

        let source_data: *const u8 = ir.as_ptr();
        let source_len = ir.len() as u64;
        let source_name = SOURCE_NAME_C.as_ptr() as *const c_char;

        let mut outputs = CompilerOutputs::new(entry);
        let (num_outputs, data_outputs, len_outputs, name_outputs) = outputs.out_params();

        debug!("calling {INVOKE_SYMBOL} with {argc} arguments, {} IR bytes", ir.len());
        // SAFETY: argv holds `argc` NUL-terminated strings kept alive by
        // `c_args`; the single source is valid for `source_len` bytes; no
        // headers are passed; the out-parameters point into `outputs`, which
        // stays in place until after the call.
        let status = unsafe {
            (entry.invoke)(
                argc,
                argv.as_ptr(),
                1,
                &source_data,
                &source_len,
                &source_name,
                0,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                num_outputs,
                data_outputs,
                len_outputs,
                name_outputs,
            )
        };
        if status != 0 {
            return Err(BackendError::ForeignCallFailed {
                call: INVOKE_SYMBOL,
                status,
            });
        }

        let result = {
            // SAFETY: `oclocInvoke` succeeded, so the out-parameters describe
            // its outputs. The descriptors are dropped before release.
            let descriptors = unsafe { outputs.descriptors() }?;
            extract_outputs(&descriptors)?
        };
        outputs.release()?;
        Ok(result)
    }
}

/// Translate `request.ir` into a device binary with the device compiler.
///
/// The compiler library is loaded for this call only and unloaded before
/// returning. Any error means the compilation unit is lost; nothing is
/// retried.
pub fn translate_il(
    request: &TranslationRequest<'_>,
    config: &BridgeConfig,
) -> Result<ILTranslationResult> {
    let command = OclocCommand::new(request, config)?;
    let lib = LibOcloc::load(config)?;
    command.run(lib.entry_points(), request.ir)
}

/// Build the `oclocInvoke` argument vector. The order is fixed; some of the
/// compiler's flags are positional.
fn build_args(
    device: &DeviceCode,
    revision: &RevisionId,
    input_kind: InputKind,
    options: &str,
    internal_options: &str,
    quiet: bool,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "ocloc".into(),
        "compile".into(),
        "-device".into(),
        device.to_string(),
    ];
    if !revision.is_empty() {
        args.push("-revision_id".into());
        args.push(revision.to_string());
    }
    args.push(input_kind.flag().into());
    args.push("-file".into());
    args.push(SOURCE_NAME.into());
    args.push("-options".into());
    args.push(options.into());
    args.push("-internal_options".into());
    args.push(internal_options.into());
    if quiet {
        args.push("-q".into());
    }
    args
}
