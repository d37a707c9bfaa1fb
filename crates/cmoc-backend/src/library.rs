//! Loading the device compiler library.
//!
//! The library is opened and its two entry points resolved on every
//! translation. [`LibOcloc`] owns the handle; dropping it unloads the
//! library, so the [`EntryPoints`] it lends out cannot outlive it.

use std::os::raw::{c_char, c_int};
use std::path::{Path, PathBuf};

use libloading::Library;
use log::debug;

use crate::config::BridgeConfig;
use crate::error::{BackendError, Result};

#[cfg(windows)]
const DEFAULT_LIBOCLOC_NAME: &str = "ocloc64.dll";
#[cfg(not(windows))]
const DEFAULT_LIBOCLOC_NAME: &str = "libocloc.so";

/// File name of the device compiler library, fixed at build time.
/// Set `CMOC_LIBOCLOC_NAME` while building to override it.
pub const LIBOCLOC_NAME: &str = match option_env!("CMOC_LIBOCLOC_NAME") {
    Some(name) => name,
    None => DEFAULT_LIBOCLOC_NAME,
};

/// Symbol name of the compile entry point.
pub const INVOKE_SYMBOL: &str = "oclocInvoke";
/// Symbol name of the output release entry point.
pub const FREE_OUTPUT_SYMBOL: &str = "oclocFreeOutput";

/// `oclocInvoke`: run one command line over in-memory sources.
pub type InvokeFn = unsafe extern "C" fn(
    num_args: u32,
    argv: *const *const c_char,
    num_sources: u32,
    data_sources: *const *const u8,
    len_sources: *const u64,
    name_sources: *const *const c_char,
    num_input_headers: u32,
    data_input_headers: *const *const u8,
    len_input_headers: *const u64,
    name_input_headers: *const *const c_char,
    num_outputs: *mut u32,
    data_outputs: *mut *mut *mut u8,
    len_outputs: *mut *mut u64,
    name_outputs: *mut *mut *mut c_char,
) -> c_int;

/// `oclocFreeOutput`: release the arrays returned by `oclocInvoke`.
pub type FreeOutputFn = unsafe extern "C" fn(
    num_outputs: *mut u32,
    data_outputs: *mut *mut *mut u8,
    len_outputs: *mut *mut u64,
    name_outputs: *mut *mut *mut c_char,
) -> c_int;

/// The two resolved entry points. Both are non-null and callable for as
/// long as the library that produced them stays loaded.
#[derive(Debug)]
pub struct EntryPoints {
    pub(crate) invoke: InvokeFn,
    pub(crate) free_output: FreeOutputFn,
}

impl EntryPoints {
    /// Wrap entry points obtained some other way (e.g. statically linked).
    ///
    /// # Safety
    ///
    /// Both functions must follow the `oclocInvoke` / `oclocFreeOutput`
    /// contract, and `free_output` must accept exactly what `invoke` returns.
    pub unsafe fn from_raw(invoke: InvokeFn, free_output: FreeOutputFn) -> Self {
        Self {
            invoke,
            free_output,
        }
    }
}

/// A loaded device compiler library.
pub struct LibOcloc {
    entry: EntryPoints,
    path: PathBuf,
    // Dropped last: unloading invalidates `entry`.
    _lib: Library,
}

impl LibOcloc {
    /// Load the library named [`LIBOCLOC_NAME`] from the configured directory.
    pub fn load(config: &BridgeConfig) -> Result<Self> {
        Self::load_from(&library_path(config))
    }

    /// Load a device compiler library from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("loading device compiler from {}", path.display());

        // SAFETY: opening the library runs its initializers; the device
        // compiler has no requirements beyond a normal process.
        let lib = unsafe { Library::new(path) }.map_err(|e| BackendError::LibraryLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let invoke = resolve::<InvokeFn>(&lib, INVOKE_SYMBOL)?;
        let free_output = resolve::<FreeOutputFn>(&lib, FREE_OUTPUT_SYMBOL)?;

        Ok(Self {
            entry: EntryPoints {
                invoke,
                free_output,
            },
            path: path.to_path_buf(),
            _lib: lib,
        })
    }

    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LibOcloc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibOcloc").field("path", &self.path).finish()
    }
}

/// Full path of the library: the configured directory joined with
/// [`LIBOCLOC_NAME`]. Without a directory the bare file name is returned and
/// the platform loader's search path applies.
pub fn library_path(config: &BridgeConfig) -> PathBuf {
    config
        .ocloc_dir
        .as_deref()
        .unwrap_or(Path::new(""))
        .join(LIBOCLOC_NAME)
}

fn resolve<T: Copy>(lib: &Library, symbol: &'static str) -> Result<T> {
    // SAFETY: `T` is the C prototype published for `symbol`.
    let sym = unsafe { lib.get::<T>(symbol.as_bytes()) }.map_err(|e| {
        debug!("resolving {symbol}: {e}");
        BackendError::SymbolMissing { symbol }
    })?;
    debug!("resolved {symbol}");
    Ok(*sym)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_search_uses_bare_name() {
        let path = library_path(&BridgeConfig::default());
        assert_eq!(path, Path::new(LIBOCLOC_NAME));
    }

    #[test]
    fn configured_directory_is_joined() {
        let cfg = BridgeConfig {
            ocloc_dir: Some("/opt/intel/ocloc".into()),
            ..Default::default()
        };
        assert_eq!(
            library_path(&cfg),
            Path::new("/opt/intel/ocloc").join(LIBOCLOC_NAME)
        );
    }

    #[test]
    fn missing_library_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BridgeConfig {
            ocloc_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = LibOcloc::load(&cfg).unwrap_err();
        match err {
            BackendError::LibraryLoad { path, message } => {
                assert_eq!(path, dir.path().join(LIBOCLOC_NAME));
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LIBOCLOC_NAME);
        std::fs::write(&path, b"not a shared object").unwrap();
        assert!(matches!(
            LibOcloc::load_from(&path),
            Err(BackendError::LibraryLoad { .. })
        ));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn library_without_entry_points_reports_invoke_first() {
        let err = LibOcloc::load_from(Path::new("libc.so.6")).unwrap_err();
        assert!(matches!(
            err,
            BackendError::SymbolMissing {
                symbol: INVOKE_SYMBOL
            }
        ));
        assert_eq!(err.to_string(), "oclocInvoke symbol is missing");
    }
}
