//! Raw bindings to the Ghostscript interpreter C API (`iapi.h`, `ierrors.h`).
//!
//! This crate only declares the ABI. It performs no validation and owns no
//! state; the `ghostscript` crate builds the safe lifecycle on top of it.
//!
//! # Linking
//!
//! The `gsapi_*` functions are only declared when the `link` feature is
//! enabled, which links against `libgs` (`gsdll64` on Windows). Set
//! `GHOSTSCRIPT_LIB_DIR` to add a directory to the library search path:
//!
//! ```sh
//! export GHOSTSCRIPT_LIB_DIR=/opt/ghostscript/lib
//! cargo build --features link
//! ```
//!
//! # Safety
//!
//! Every function is `unsafe extern "C"`: the caller must uphold the
//! interpreter's call-order protocol and pass valid pointers.

#![allow(non_camel_case_types, non_upper_case_globals)]

use std::ffi::{c_char, c_int, c_long};
#[cfg(feature = "link")]
use std::ffi::{c_uint, c_void};

/// Revision information filled in by [`gsapi_revision`].
///
/// The string pointers refer to static storage inside the library and must
/// not be freed.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct gsapi_revision_t {
    pub product: *const c_char,
    pub copyright: *const c_char,
    pub revision: c_long,
    pub revisiondate: c_long,
}

impl Default for gsapi_revision_t {
    fn default() -> Self {
        Self {
            product: std::ptr::null(),
            copyright: std::ptr::null(),
            revision: 0,
            revisiondate: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Error codes (ierrors.h)
// ---------------------------------------------------------------------------

pub const gs_error_ok: c_int = 0;
pub const gs_error_unknownerror: c_int = -1;
pub const gs_error_dictfull: c_int = -2;
pub const gs_error_dictstackoverflow: c_int = -3;
pub const gs_error_dictstackunderflow: c_int = -4;
pub const gs_error_execstackoverflow: c_int = -5;
pub const gs_error_interrupt: c_int = -6;
pub const gs_error_invalidaccess: c_int = -7;
pub const gs_error_invalidexit: c_int = -8;
pub const gs_error_invalidfileaccess: c_int = -9;
pub const gs_error_invalidfont: c_int = -10;
pub const gs_error_invalidrestore: c_int = -11;
pub const gs_error_ioerror: c_int = -12;
pub const gs_error_limitcheck: c_int = -13;
pub const gs_error_nocurrentpoint: c_int = -14;
pub const gs_error_rangecheck: c_int = -15;
pub const gs_error_stackoverflow: c_int = -16;
pub const gs_error_stackunderflow: c_int = -17;
pub const gs_error_syntaxerror: c_int = -18;
pub const gs_error_timeout: c_int = -19;
pub const gs_error_typecheck: c_int = -20;
pub const gs_error_undefined: c_int = -21;
pub const gs_error_undefinedfilename: c_int = -22;
pub const gs_error_undefinedresult: c_int = -23;
pub const gs_error_unmatchedmark: c_int = -24;
pub const gs_error_VMerror: c_int = -25;
pub const gs_error_configurationerror: c_int = -26;
pub const gs_error_undefinedresource: c_int = -27;
pub const gs_error_unregistered: c_int = -28;
pub const gs_error_invalidcontext: c_int = -29;
pub const gs_error_invalidid: c_int = -30;

// Internal codes, never raised as PostScript errors.
pub const gs_error_hit_detected: c_int = -99;
pub const gs_error_Fatal: c_int = -100;
pub const gs_error_Quit: c_int = -101;
pub const gs_error_InterpreterExit: c_int = -102;
pub const gs_error_Remap_Color: c_int = -103;
pub const gs_error_ExecStackUnderflow: c_int = -104;
pub const gs_error_VMreclaim: c_int = -105;
pub const gs_error_NeedInput: c_int = -106;
pub const gs_error_Info: c_int = -110;

/// Legacy alias used by headers before 9.18.
pub const e_Fatal: c_int = gs_error_Fatal;

// ---------------------------------------------------------------------------
// Entry points (iapi.h)
// ---------------------------------------------------------------------------

#[cfg(feature = "link")]
#[cfg_attr(not(windows), link(name = "gs"))]
#[cfg_attr(windows, link(name = "gsdll64"))]
unsafe extern "C" {
    /// Fills `pr` with revision information. Returns 0 on success, or the
    /// size the library expects when `len` is too small.
    pub fn gsapi_revision(pr: *mut gsapi_revision_t, len: c_int) -> c_int;

    /// Creates the single interpreter instance. Returns a negative code on
    /// failure.
    pub fn gsapi_new_instance(pinstance: *mut *mut c_void, caller_handle: *mut c_void) -> c_int;

    /// Destroys an instance. Call [`gsapi_exit`] first if
    /// [`gsapi_init_with_args`] was called.
    pub fn gsapi_delete_instance(instance: *mut c_void);

    /// Initializes the interpreter from a command-line style argument
    /// vector. `argv[0]` is ignored.
    pub fn gsapi_init_with_args(
        instance: *mut c_void,
        argc: c_int,
        argv: *mut *mut c_char,
    ) -> c_int;

    /// Runs `length` bytes of PostScript from `str_`.
    pub fn gsapi_run_string_with_length(
        instance: *mut c_void,
        str_: *const c_char,
        length: c_uint,
        user_errors: c_int,
        pexit_code: *mut c_int,
    ) -> c_int;

    /// Runs the file at `file_name` (NUL-terminated path).
    pub fn gsapi_run_file(
        instance: *mut c_void,
        file_name: *const c_char,
        user_errors: c_int,
        pexit_code: *mut c_int,
    ) -> c_int;

    /// Exits the interpreter. Must be called after a successful
    /// initialization, before [`gsapi_delete_instance`].
    pub fn gsapi_exit(instance: *mut c_void) -> c_int;
}
