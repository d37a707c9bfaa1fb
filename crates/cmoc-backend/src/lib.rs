//! Bridge from SPIR-V to the vendor offline device compiler.
//!
//! The device compiler ships as a shared library (`libocloc`) with a
//! command-line shaped C entry point. This crate loads it, composes the
//! command line, hands over the IR, and copies the kernel binary and
//! optional debug info back out.
//!
//! ## Modules
//!
//! - [`config`] — Environment and file configuration of the bridge
//! - [`options`] — Public and internal option string composition
//! - [`library`] — Loading the compiler library and its entry points
//! - [`output`] — Classification of the compiler's output buffers
//! - [`invoke`] — The `translate_il` entry point
//! - [`diagnostics`] — Debug echo of the command line
//! - [`error`] — Error types
//!
//! Every failure is terminal for the current compilation. The bridge never
//! exits the process itself; the outermost caller decides what "fatal" means.
//!
//! Each call loads the library afresh. Concurrent calls are only safe if the
//! device compiler library is itself reentrant.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod invoke;
pub mod library;
pub mod options;
pub mod output;

// Re-export key types for convenience
pub use config::BridgeConfig;
pub use error::{BackendError, Result};
pub use invoke::{translate_il, InputKind, OclocCommand, TranslationRequest};
pub use library::{EntryPoints, LibOcloc};
pub use options::{compose_internal_options, compose_options};
pub use output::{extract_outputs, ILTranslationResult, OutputDescriptor};
