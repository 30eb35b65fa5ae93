//! Scoped conversion of Rust strings and bytes into native buffers.
//!
//! Every buffer handed to the interpreter is owned by a guard value that frees
//! it in `Drop`, so a buffer is released exactly once on every path out of
//! the call that built it, including early returns and unwinding.

use crate::error::GsError;
use std::ffi::{CStr, CString, c_char, c_int, c_uint};
use std::ptr;

fn nul_error(what: impl std::fmt::Display, position: usize) -> GsError {
    GsError::InvalidArgument(format!("{what} contains a NUL byte at position {position}"))
}

/// An owned `argv`-style array of NUL-terminated strings.
///
/// The pointer array carries a trailing null entry, as C `main` does, which
/// is not counted by [`CStringArray::argc`].
#[derive(Debug)]
pub struct CStringArray {
    ptrs: Vec<*mut c_char>,
}

impl CStringArray {
    /// Builds the array from an ordered sequence of arguments.
    ///
    /// Fails without leaking anything already converted if an argument holds
    /// a NUL byte or if there are more arguments than a `c_int` can count.
    pub fn new<I, S>(args: I) -> Result<Self, GsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args = args.into_iter();
        let mut array = CStringArray {
            ptrs: Vec::with_capacity(args.size_hint().0 + 1),
        };
        for (index, arg) in args.enumerate() {
            let owned = CString::new(arg.as_ref())
                .map_err(|e| nul_error(format_args!("argument {index}"), e.nul_position()))?;
            array.ptrs.push(owned.into_raw());
        }
        if c_int::try_from(array.ptrs.len()).is_err() {
            return Err(GsError::InvalidArgument(format!(
                "{} arguments exceed the native argument count limit",
                array.ptrs.len()
            )));
        }
        array.ptrs.push(ptr::null_mut());
        Ok(array)
    }

    /// Number of arguments, excluding the trailing null.
    pub fn argc(&self) -> c_int {
        // Bounded in `new`.
        (self.ptrs.len() - 1) as c_int
    }

    pub fn is_empty(&self) -> bool {
        self.argc() == 0
    }

    /// Pointer to the first element. Valid while `self` is alive.
    pub fn as_mut_ptr(&mut self) -> *mut *mut c_char {
        self.ptrs.as_mut_ptr()
    }
}

impl Drop for CStringArray {
    fn drop(&mut self) {
        for p in self.ptrs.drain(..) {
            if !p.is_null() {
                // SAFETY: every non-null entry came from `CString::into_raw`
                // and is reclaimed only here.
                drop(unsafe { CString::from_raw(p) });
            }
        }
    }
}

/// A single owned NUL-terminated string for one native call.
#[derive(Debug)]
pub struct NativeString {
    inner: CString,
}

impl NativeString {
    pub fn new(value: &str) -> Result<Self, GsError> {
        let inner = CString::new(value).map_err(|e| nul_error("string", e.nul_position()))?;
        Ok(Self { inner })
    }

    /// Converts a filesystem path. On Unix the raw bytes are used, so paths
    /// that are not valid UTF-8 still work.
    pub fn from_path(path: &std::path::Path) -> Result<Self, GsError> {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            let inner = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
                GsError::InvalidArgument(format!("path {} contains a NUL byte", path.display()))
            })?;
            Ok(Self { inner })
        }
        #[cfg(not(unix))]
        {
            let value = path.to_str().ok_or_else(|| {
                GsError::InvalidArgument(format!("path {} is not valid UTF-8", path.display()))
            })?;
            Self::new(value)
        }
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.inner.as_ptr()
    }

    /// Length in bytes, excluding the terminator, as the native length type.
    pub fn native_len(&self) -> Result<c_uint, GsError> {
        native_len(self.inner.as_bytes().len())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.as_bytes().is_empty()
    }
}

/// An owned byte buffer passed together with its length.
///
/// Unlike [`NativeString`] the contents may hold NUL bytes: the receiver
/// reads exactly [`native_len`](NativeBytes::native_len) bytes. A terminator
/// is still appended after the contents.
#[derive(Debug)]
pub struct NativeBytes {
    inner: Vec<u8>,
}

impl NativeBytes {
    pub fn new(value: impl AsRef<[u8]>) -> Self {
        let value = value.as_ref();
        let mut inner = Vec::with_capacity(value.len() + 1);
        inner.extend_from_slice(value);
        inner.push(0);
        Self { inner }
    }

    /// The contents without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner[..self.inner.len() - 1]
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.inner.as_ptr().cast()
    }

    /// Length of the contents as the native length type.
    pub fn native_len(&self) -> Result<c_uint, GsError> {
        native_len(self.as_bytes().len())
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

fn native_len(len: usize) -> Result<c_uint, GsError> {
    c_uint::try_from(len).map_err(|_| {
        GsError::InvalidArgument(format!("{len} bytes exceed the native length limit"))
    })
}

/// Reads a native string into an owned `String`, replacing invalid UTF-8.
/// A null pointer reads as the empty string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub unsafe fn read_c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Reads an `argv`-style array back into owned strings.
///
/// # Safety
///
/// `argv` must point to at least `argc` entries, each null or a valid
/// NUL-terminated string. A negative `argc` or null `argv` reads as empty.
pub unsafe fn read_c_string_array(argc: c_int, argv: *const *mut c_char) -> Vec<String> {
    if argv.is_null() || argc <= 0 {
        return Vec::new();
    }
    let entries = unsafe { std::slice::from_raw_parts(argv, argc as usize) };
    entries
        .iter()
        .map(|&p| unsafe { read_c_string(p) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_round_trips_arguments() {
        let args = ["gs", "-q", "-dBATCH", "-sOutputFile=out.pdf", "in.pdf"];
        let mut array = CStringArray::new(args).unwrap();
        assert_eq!(array.argc(), 5);

        let read = unsafe { read_c_string_array(array.argc(), array.as_mut_ptr()) };
        assert_eq!(read, args);
    }

    #[test]
    fn test_array_is_null_terminated() {
        let mut array = CStringArray::new(vec!["gs".to_string()]).unwrap();
        let argv = array.as_mut_ptr();
        let terminator = unsafe { *argv.add(1) };
        assert!(terminator.is_null());
    }

    #[test]
    fn test_array_rejects_nul_byte() {
        let err = CStringArray::new(["gs", "bad\0arg"]).unwrap_err();
        assert!(matches!(err, GsError::InvalidArgument(ref m) if m.contains("argument 1")));
    }

    #[test]
    fn test_empty_array() {
        let array = CStringArray::new(Vec::<String>::new()).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.argc(), 0);
    }

    #[test]
    fn test_native_string_length_excludes_terminator() {
        let s = NativeString::new("showpage").unwrap();
        assert_eq!(s.native_len().unwrap(), 8);
        assert!(!s.is_empty());
        assert_eq!(unsafe { read_c_string(s.as_ptr()) }, "showpage");
    }

    #[test]
    fn test_native_string_rejects_nul_byte() {
        assert!(NativeString::new("a\0b").is_err());
    }

    #[test]
    fn test_native_bytes_keep_nul_and_invalid_utf8() {
        let source = b"<00>\0\xffshowpage";
        let bytes = NativeBytes::new(source);
        assert_eq!(bytes.as_bytes(), source);
        assert_eq!(bytes.native_len().unwrap(), source.len() as c_uint);

        let read =
            unsafe { std::slice::from_raw_parts(bytes.as_ptr().cast::<u8>(), source.len() + 1) };
        assert_eq!(&read[..source.len()], source);
        assert_eq!(read[source.len()], 0);
    }

    #[test]
    fn test_empty_native_bytes() {
        let bytes = NativeBytes::new("");
        assert!(bytes.is_empty());
        assert_eq!(bytes.native_len().unwrap(), 0);
        assert!(!bytes.as_ptr().is_null());
    }

    #[test]
    fn test_native_string_from_path() {
        let s = NativeString::from_path(std::path::Path::new("/tmp/in.ps")).unwrap();
        assert_eq!(unsafe { read_c_string(s.as_ptr()) }, "/tmp/in.ps");
    }

    #[test]
    fn test_read_null_pointers() {
        assert_eq!(unsafe { read_c_string(ptr::null()) }, "");
        assert!(unsafe { read_c_string_array(3, ptr::null()) }.is_empty());
    }
}
