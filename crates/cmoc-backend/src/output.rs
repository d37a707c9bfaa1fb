//! Compiler output buffers.
//!
//! `oclocInvoke` returns three parallel arrays (data, length, name) owned by
//! the compiler library. We only want two of the entries: the `.gen` kernel
//! binary, which is always produced on success, and the optional `.dbg`
//! debug info. Both are copied out before the arrays are released.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use log::{debug, trace, warn};
use sha2::{Digest, Sha256};

use crate::error::{BackendError, Result};
use crate::library::EntryPoints;

/// Name suffix of the kernel binary output.
pub const GEN_SUFFIX: &[u8] = b".gen";
/// Name suffix of the debug info output.
pub const DBG_SUFFIX: &[u8] = b".dbg";

/// Kernel binary and debug info copied out of the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ILTranslationResult {
    /// Device binary from the `.gen` output.
    pub kernel_binary: Vec<u8>,
    /// Debug info from the `.dbg` output; empty when none was produced.
    pub debug_info: Vec<u8>,
}

impl ILTranslationResult {
    pub fn has_debug_info(&self) -> bool {
        !self.debug_info.is_empty()
    }

    /// SHA-256 of the kernel binary as lowercase hex.
    pub fn kernel_digest(&self) -> String {
        let hash: [u8; 32] = Sha256::digest(&self.kernel_binary).into();
        hash.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// A borrowed view of one compiler output. Only valid until the outputs
/// are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputDescriptor<'a> {
    /// Output file name, without the terminating NUL.
    pub name: &'a [u8],
    /// Output bytes; arbitrary binary data.
    pub data: &'a [u8],
}

/// Copy the kernel binary and debug info out of `outputs`.
///
/// The first name ending in `.gen` is the kernel binary and must exist.
/// The first name ending in `.dbg`, if any, is the debug info. Later
/// duplicates are ignored.
pub fn extract_outputs(outputs: &[OutputDescriptor<'_>]) -> Result<ILTranslationResult> {
    let kernel = outputs
        .iter()
        .find(|o| o.name.ends_with(GEN_SUFFIX))
        .ok_or_else(|| BackendError::ContractViolation {
            detail: format!(
                "gen binary is missing from {} compiler output(s)",
                outputs.len()
            ),
        })?;
    let dbg = outputs.iter().find(|o| o.name.ends_with(DBG_SUFFIX));

    debug!(
        "kernel binary {} ({} bytes), debug info {}",
        String::from_utf8_lossy(kernel.name),
        kernel.data.len(),
        dbg.map_or(0, |d| d.data.len())
    );

    Ok(ILTranslationResult {
        kernel_binary: kernel.data.to_vec(),
        debug_info: dbg.map(|d| d.data.to_vec()).unwrap_or_default(),
    })
}

/// The four out-parameters of `oclocInvoke`, released through
/// `oclocFreeOutput` exactly once.
///
/// [`release`](Self::release) frees them on the normal path. If the guard is
/// dropped without that (failed invoke, failed extraction, unwinding), `Drop`
/// frees them instead and only logs a failing status.
pub(crate) struct CompilerOutputs<'e> {
    entry: &'e EntryPoints,
    num: u32,
    data: *mut *mut u8,
    lens: *mut u64,
    names: *mut *mut c_char,
    released: bool,
}

impl<'e> CompilerOutputs<'e> {
    pub(crate) fn new(entry: &'e EntryPoints) -> Self {
        Self {
            entry,
            num: 0,
            data: ptr::null_mut(),
            lens: ptr::null_mut(),
            names: ptr::null_mut(),
            released: false,
        }
    }

    /// Out-parameter pointers in `oclocInvoke` argument order.
    pub(crate) fn out_params(
        &mut self,
    ) -> (
        *mut u32,
        *mut *mut *mut u8,
        *mut *mut u64,
        *mut *mut *mut c_char,
    ) {
        (
            &mut self.num,
            &mut self.data,
            &mut self.lens,
            &mut self.names,
        )
    }

    /// Borrow the outputs as descriptors.
    ///
    /// # Safety
    ///
    /// The out-parameters must have been filled in by a successful
    /// `oclocInvoke`: `num` entries in each array, every name NUL-terminated,
    /// every non-null data pointer valid for its length. A null data pointer
    /// with a non-zero length is reported as a contract violation.
    pub(crate) unsafe fn descriptors(&self) -> Result<Vec<OutputDescriptor<'_>>> {
        let n = self.num as usize;
        if n == 0 || self.data.is_null() || self.lens.is_null() || self.names.is_null() {
            return Ok(Vec::new());
        }

        let data = slice::from_raw_parts(self.data, n);
        let lens = slice::from_raw_parts(self.lens, n);
        let names = slice::from_raw_parts(self.names, n);

        let mut out = Vec::with_capacity(n);
        for ((&bytes, &len), &name) in data.iter().zip(lens).zip(names) {
            let len = usize::try_from(len).map_err(|_| BackendError::ContractViolation {
                detail: format!("output length {len} does not fit in memory"),
            })?;
            let name = if name.is_null() {
                &[][..]
            } else {
                CStr::from_ptr(name).to_bytes()
            };
            let data = if len == 0 {
                &[][..]
            } else if bytes.is_null() {
                return Err(BackendError::ContractViolation {
                    detail: format!(
                        "output '{}' reports {len} bytes but has no data",
                        String::from_utf8_lossy(name)
                    ),
                });
            } else {
                slice::from_raw_parts(bytes as *const u8, len)
            };
            trace!("output {} ({len} bytes)", String::from_utf8_lossy(name));
            out.push(OutputDescriptor { name, data });
        }
        Ok(out)
    }

    /// Release the outputs, consuming the guard.
    pub(crate) fn release(mut self) -> Result<()> {
        self.released = true;
        match self.free() {
            0 => Ok(()),
            status => Err(BackendError::ForeignCallFailed {
                call: "oclocFreeOutput",
                status,
            }),
        }
    }

    fn is_untouched(&self) -> bool {
        self.num == 0 && self.data.is_null() && self.lens.is_null() && self.names.is_null()
    }

    fn free(&mut self) -> i32 {
        debug!("releasing {} compiler output(s)", self.num);
        // SAFETY: the pointers are exactly what `oclocInvoke` wrote (or null),
        // and this guard calls `free_output` at most once.
        unsafe {
            (self.entry.free_output)(
                &mut self.num,
                &mut self.data,
                &mut self.lens,
                &mut self.names,
            )
        }
    }
}

impl Drop for CompilerOutputs<'_> {
    fn drop(&mut self) {
        if self.released || self.is_untouched() {
            return;
        }
        self.released = true;
        let status = self.free();
        if status != 0 {
            warn!("oclocFreeOutput failed with status {status} while discarding outputs");
        }
    }
}
