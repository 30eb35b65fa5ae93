//! Classification of the signed integer codes returned by the interpreter.
//!
//! Ghostscript reports every outcome as a `c_int`:
//!
//! - `code >= 0`: success
//! - `gs_error_Fatal < code < 0`: a recoverable error (PostScript errors and
//!   most internal codes)
//! - `code <= gs_error_Fatal`: the interpreter state is unrecoverable without
//!   a full exit

use ghostscript_sys as sys;
use std::ffi::c_int;
use std::fmt;

/// Codes at or below this value are fatal.
pub const FATAL_THRESHOLD: c_int = sys::gs_error_Fatal;

/// Severity band of a native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Fatal,
}

/// A raw code returned by a `gsapi_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeCode(pub c_int);

impl NativeCode {
    pub fn get(self) -> c_int {
        self.0
    }

    pub fn severity(self) -> Severity {
        match self.0 {
            c if c >= 0 => Severity::Success,
            c if c <= FATAL_THRESHOLD => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    pub fn is_success(self) -> bool {
        self.severity() == Severity::Success
    }

    pub fn is_fatal(self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// The symbolic name from `ierrors.h`, without the `gs_error_` prefix.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            sys::gs_error_ok => "ok",
            sys::gs_error_unknownerror => "unknownerror",
            sys::gs_error_dictfull => "dictfull",
            sys::gs_error_dictstackoverflow => "dictstackoverflow",
            sys::gs_error_dictstackunderflow => "dictstackunderflow",
            sys::gs_error_execstackoverflow => "execstackoverflow",
            sys::gs_error_interrupt => "interrupt",
            sys::gs_error_invalidaccess => "invalidaccess",
            sys::gs_error_invalidexit => "invalidexit",
            sys::gs_error_invalidfileaccess => "invalidfileaccess",
            sys::gs_error_invalidfont => "invalidfont",
            sys::gs_error_invalidrestore => "invalidrestore",
            sys::gs_error_ioerror => "ioerror",
            sys::gs_error_limitcheck => "limitcheck",
            sys::gs_error_nocurrentpoint => "nocurrentpoint",
            sys::gs_error_rangecheck => "rangecheck",
            sys::gs_error_stackoverflow => "stackoverflow",
            sys::gs_error_stackunderflow => "stackunderflow",
            sys::gs_error_syntaxerror => "syntaxerror",
            sys::gs_error_timeout => "timeout",
            sys::gs_error_typecheck => "typecheck",
            sys::gs_error_undefined => "undefined",
            sys::gs_error_undefinedfilename => "undefinedfilename",
            sys::gs_error_undefinedresult => "undefinedresult",
            sys::gs_error_unmatchedmark => "unmatchedmark",
            sys::gs_error_VMerror => "VMerror",
            sys::gs_error_configurationerror => "configurationerror",
            sys::gs_error_undefinedresource => "undefinedresource",
            sys::gs_error_unregistered => "unregistered",
            sys::gs_error_invalidcontext => "invalidcontext",
            sys::gs_error_invalidid => "invalidid",
            sys::gs_error_hit_detected => "hit_detected",
            sys::gs_error_Fatal => "Fatal",
            sys::gs_error_Quit => "Quit",
            sys::gs_error_InterpreterExit => "InterpreterExit",
            sys::gs_error_Remap_Color => "Remap_Color",
            sys::gs_error_ExecStackUnderflow => "ExecStackUnderflow",
            sys::gs_error_VMreclaim => "VMreclaim",
            sys::gs_error_NeedInput => "NeedInput",
            sys::gs_error_Info => "Info",
            _ => return None,
        };
        Some(name)
    }
}

impl From<c_int> for NativeCode {
    fn from(code: c_int) -> Self {
        NativeCode(code)
    }
}

impl fmt::Display for NativeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}
