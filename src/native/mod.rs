//! The seam between the safe bindings and the interpreter library.
//!
//! [`NativeApi`] mirrors the `gsapi_*` entry points one to one. The lifecycle
//! code in [`crate::instance`] only ever talks to the library through this
//! trait, which lets it run against:
//!
//! - [`LibGs`]: the linked Ghostscript library (feature: `libgs`)
//! - [`ScriptedApi`]: an in-memory interpreter with programmable return codes,
//!   used by the test suite and available to downstream tests

#[cfg(feature = "libgs")]
mod libgs;
mod scripted;

#[cfg(feature = "libgs")]
pub use libgs::LibGs;
pub use scripted::{NativeCall, ScriptedApi};

use crate::registry::InstanceRegistry;
use ghostscript_sys::gsapi_revision_t;
use std::ffi::{c_char, c_int, c_uint, c_void};
use std::fmt::Debug;

/// The interpreter's C entry points.
///
/// Implementations must be shareable across threads: the revision probe may
/// run concurrently from anywhere. Calls against one instance pointer are
/// serialized by the caller.
///
/// # Safety
///
/// Every method takes raw pointers and is `unsafe` to call. Callers pass
/// pointers that are valid for the duration of the call and respect the
/// interpreter's call order (new → init → run → exit → delete).
pub trait NativeApi: Send + Sync + Debug {
    /// `gsapi_revision`: fills `revision` and returns 0, or returns the size
    /// the library expects when `len` does not match.
    ///
    /// # Safety
    ///
    /// `len` must not exceed the size of `*revision`.
    unsafe fn revision(&self, revision: &mut gsapi_revision_t, len: c_int) -> c_int;

    /// `gsapi_new_instance`: stores the new instance in `instance`.
    ///
    /// # Safety
    ///
    /// `caller_handle` is passed through to the library unchanged.
    unsafe fn new_instance(&self, instance: &mut *mut c_void, caller_handle: *mut c_void) -> c_int;

    /// `gsapi_delete_instance`.
    ///
    /// # Safety
    ///
    /// `instance` must come from `new_instance` and not be used afterwards.
    unsafe fn delete_instance(&self, instance: *mut c_void);

    /// `gsapi_init_with_args`.
    ///
    /// # Safety
    ///
    /// `argv` must point to `argc` valid NUL-terminated strings.
    unsafe fn init_with_args(&self, instance: *mut c_void, argc: c_int, argv: *mut *mut c_char)
    -> c_int;

    /// `gsapi_run_string_with_length`.
    ///
    /// # Safety
    ///
    /// `text` must point to at least `length` readable bytes.
    unsafe fn run_string_with_length(
        &self,
        instance: *mut c_void,
        text: *const c_char,
        length: c_uint,
        user_errors: c_int,
        exit_code: &mut c_int,
    ) -> c_int;

    /// `gsapi_run_file`.
    ///
    /// # Safety
    ///
    /// `file_name` must be a valid NUL-terminated string.
    unsafe fn run_file(
        &self,
        instance: *mut c_void,
        file_name: *const c_char,
        user_errors: c_int,
        exit_code: &mut c_int,
    ) -> c_int;

    /// `gsapi_exit`.
    ///
    /// # Safety
    ///
    /// `instance` must come from `new_instance`.
    unsafe fn exit(&self, instance: *mut c_void) -> c_int;

    /// A human-readable name for this backend (for logging).
    fn name(&self) -> &'static str;

    /// The registry enforcing the single-instance rule for this backend.
    ///
    /// Backends that drive the real library must keep the default: the
    /// library holds one interpreter per process, whoever created it.
    fn registry(&self) -> &InstanceRegistry {
        InstanceRegistry::global()
    }
}
