//! An in-memory interpreter with programmable return codes.
//!
//! `ScriptedApi` never renders anything. It answers every entry point with a
//! configured code, decodes the buffers it receives, and records each call so
//! tests can assert on call order and arguments.
//!
//! Since it never touches the real library, each `ScriptedApi` tracks its
//! instance in a registry of its own, so independent tests do not contend
//! for the process-wide flag.

use super::NativeApi;
use crate::marshal::{read_c_string, read_c_string_array};
use crate::registry::InstanceRegistry;
use ghostscript_sys::{gs_error_ok, gsapi_revision_t};
use std::ffi::{CString, c_char, c_int, c_long, c_uint, c_void};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Opaque instance pointers handed out by [`ScriptedApi`] point here.
static INSTANCE_TAG: u8 = 0;

/// One recorded entry-point call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    Revision,
    NewInstance,
    DeleteInstance,
    InitWithArgs(Vec<String>),
    /// The exact bytes received, including any NUL bytes.
    RunString(Vec<u8>),
    RunFile(String),
    Exit,
}

#[derive(Debug, Clone, Copy)]
struct Codes {
    revision: c_int,
    new_instance: c_int,
    null_instance: bool,
    init: c_int,
    run_string: c_int,
    run_file: c_int,
    run_exit_code: c_int,
    exit: c_int,
}

impl Default for Codes {
    fn default() -> Self {
        Self {
            revision: gs_error_ok,
            new_instance: gs_error_ok,
            null_instance: false,
            init: gs_error_ok,
            run_string: gs_error_ok,
            run_file: gs_error_ok,
            run_exit_code: 0,
            exit: gs_error_ok,
        }
    }
}

/// A scripted stand-in for the interpreter library.
///
/// # Example
///
/// ```
/// use ghostscript::native::{NativeCall, ScriptedApi};
///
/// let api = ScriptedApi::new(912).with_init_code(-100);
/// assert!(api.calls().is_empty());
/// assert_eq!(api.count(&NativeCall::Exit), 0);
/// ```
#[derive(Debug)]
pub struct ScriptedApi {
    product: CString,
    copyright: CString,
    revision: c_long,
    revision_date: c_long,
    codes: Mutex<Codes>,
    calls: Mutex<Vec<NativeCall>>,
    live_instances: AtomicUsize,
    registry: InstanceRegistry,
    process_wide: bool,
}

impl ScriptedApi {
    /// An interpreter reporting `revision`, answering every call with success.
    pub fn new(revision: c_long) -> Self {
        Self {
            product: c"GPL Ghostscript".to_owned(),
            copyright: c"Copyright (C) Artifex Software, Inc.  All rights reserved.".to_owned(),
            revision,
            revision_date: 20140325,
            codes: Mutex::new(Codes::default()),
            calls: Mutex::new(Vec::new()),
            live_instances: AtomicUsize::new(0),
            registry: InstanceRegistry::new(),
            process_wide: false,
        }
    }

    /// Tracks instances in the process-wide registry, as the linked library
    /// does.
    pub fn process_wide(mut self) -> Self {
        self.process_wide = true;
        self
    }

    /// Whether an instance created from this backend is alive.
    pub fn is_instantiated(&self) -> bool {
        self.registry().is_instantiated()
    }

    /// Overrides the reported product name. Interior NUL bytes truncate it.
    pub fn with_product(mut self, product: &str) -> Self {
        let bytes: Vec<u8> = product.bytes().take_while(|&b| b != 0).collect();
        self.product = CString::new(bytes).unwrap_or_default();
        self
    }

    pub fn with_revision_date(mut self, date: c_long) -> Self {
        self.revision_date = date;
        self
    }

    /// Makes the revision probe report a structure-size mismatch.
    pub fn with_revision_size_mismatch(self, expected: c_int) -> Self {
        self.update(|c| c.revision = expected);
        self
    }

    pub fn with_new_instance_code(self, code: c_int) -> Self {
        self.update(|c| c.new_instance = code);
        self
    }

    /// Makes instance creation report success without producing a handle.
    pub fn with_null_instance(self) -> Self {
        self.update(|c| c.null_instance = true);
        self
    }

    pub fn with_init_code(self, code: c_int) -> Self {
        self.set_init_code(code);
        self
    }

    pub fn with_run_code(self, code: c_int) -> Self {
        self.set_run_code(code);
        self
    }

    /// The value written to the exit-code output of the run calls.
    pub fn with_run_exit_code(self, exit_code: c_int) -> Self {
        self.update(|c| c.run_exit_code = exit_code);
        self
    }

    pub fn with_exit_code(self, code: c_int) -> Self {
        self.update(|c| c.exit = code);
        self
    }

    pub fn set_init_code(&self, code: c_int) {
        self.update(|c| c.init = code);
    }

    /// Sets the code returned by both run entry points.
    pub fn set_run_code(&self, code: c_int) {
        self.update(|c| {
            c.run_string = code;
            c.run_file = code;
        });
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many recorded calls equal `call`.
    pub fn count(&self, call: &NativeCall) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    /// Instances created and not yet deleted.
    pub fn live_instances(&self) -> usize {
        self.live_instances.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn update(&self, f: impl FnOnce(&mut Codes)) {
        f(&mut self.codes.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn codes(&self) -> Codes {
        *self.codes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: NativeCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn instance_ptr() -> *mut c_void {
        (&raw const INSTANCE_TAG).cast_mut().cast()
    }
}

impl NativeApi for ScriptedApi {
    unsafe fn revision(&self, revision: &mut gsapi_revision_t, len: c_int) -> c_int {
        self.record(NativeCall::Revision);
        let codes = self.codes();
        if codes.revision != gs_error_ok {
            return codes.revision;
        }
        let expected = std::mem::size_of::<gsapi_revision_t>() as c_int;
        if len != expected {
            return expected;
        }
        revision.product = self.product.as_ptr();
        revision.copyright = self.copyright.as_ptr();
        revision.revision = self.revision;
        revision.revisiondate = self.revision_date;
        gs_error_ok
    }

    unsafe fn new_instance(&self, instance: &mut *mut c_void, _caller_handle: *mut c_void) -> c_int {
        self.record(NativeCall::NewInstance);
        let codes = self.codes();
        if codes.new_instance < 0 {
            return codes.new_instance;
        }
        if codes.null_instance {
            *instance = std::ptr::null_mut();
        } else {
            *instance = Self::instance_ptr();
            self.live_instances.fetch_add(1, Ordering::SeqCst);
        }
        codes.new_instance
    }

    unsafe fn delete_instance(&self, instance: *mut c_void) {
        self.record(NativeCall::DeleteInstance);
        if instance == Self::instance_ptr() {
            // Saturating: a double delete must not wrap the counter.
            let _ = self
                .live_instances
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        }
    }

    unsafe fn init_with_args(
        &self,
        _instance: *mut c_void,
        argc: c_int,
        argv: *mut *mut c_char,
    ) -> c_int {
        let args = unsafe { read_c_string_array(argc, argv) };
        self.record(NativeCall::InitWithArgs(args));
        self.codes().init
    }

    unsafe fn run_string_with_length(
        &self,
        _instance: *mut c_void,
        text: *const c_char,
        length: c_uint,
        _user_errors: c_int,
        exit_code: &mut c_int,
    ) -> c_int {
        let bytes = if text.is_null() {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(text.cast::<u8>(), length as usize) }.to_vec()
        };
        self.record(NativeCall::RunString(bytes));
        let codes = self.codes();
        *exit_code = codes.run_exit_code;
        codes.run_string
    }

    unsafe fn run_file(
        &self,
        _instance: *mut c_void,
        file_name: *const c_char,
        _user_errors: c_int,
        exit_code: &mut c_int,
    ) -> c_int {
        let path = unsafe { read_c_string(file_name) };
        self.record(NativeCall::RunFile(path));
        let codes = self.codes();
        *exit_code = codes.run_exit_code;
        codes.run_file
    }

    unsafe fn exit(&self, _instance: *mut c_void) -> c_int {
        self.record(NativeCall::Exit);
        self.codes().exit
    }

    fn name(&self) -> &'static str {
        "ScriptedApi"
    }

    fn registry(&self) -> &InstanceRegistry {
        if self.process_wide {
            InstanceRegistry::global()
        } else {
            &self.registry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marshal::CStringArray;

    #[test]
    fn test_revision_fills_record() {
        let api = ScriptedApi::new(915).with_revision_date(20141103);
        let mut raw = gsapi_revision_t::default();
        let len = std::mem::size_of::<gsapi_revision_t>() as c_int;

        let code = unsafe { api.revision(&mut raw, len) };
        assert_eq!(code, 0);
        assert_eq!(raw.revision, 915);
        assert_eq!(raw.revisiondate, 20141103);
        assert_eq!(unsafe { read_c_string(raw.product) }, "GPL Ghostscript");
    }

    #[test]
    fn test_revision_reports_expected_size_on_wrong_len() {
        let api = ScriptedApi::new(915);
        let mut raw = gsapi_revision_t::default();
        let code = unsafe { api.revision(&mut raw, 4) };
        assert_eq!(code as usize, std::mem::size_of::<gsapi_revision_t>());
        assert!(raw.product.is_null());
    }

    #[test]
    fn test_new_and_delete_track_live_instances() {
        let api = ScriptedApi::new(915);
        let mut instance = std::ptr::null_mut();
        assert_eq!(unsafe { api.new_instance(&mut instance, std::ptr::null_mut()) }, 0);
        assert!(!instance.is_null());
        assert_eq!(api.live_instances(), 1);

        unsafe { api.delete_instance(instance) };
        unsafe { api.delete_instance(instance) };
        assert_eq!(api.live_instances(), 0);
    }

    #[test]
    fn test_failed_new_instance_leaves_pointer_untouched() {
        let api = ScriptedApi::new(915).with_new_instance_code(-25);
        let mut instance = std::ptr::null_mut();
        assert_eq!(unsafe { api.new_instance(&mut instance, std::ptr::null_mut()) }, -25);
        assert!(instance.is_null());
        assert_eq!(api.live_instances(), 0);
    }

    #[test]
    fn test_init_decodes_arguments() {
        let api = ScriptedApi::new(915).with_init_code(-100);
        let mut argv = CStringArray::new(["gs", "-q"]).unwrap();
        let code = unsafe {
            api.init_with_args(ScriptedApi::instance_ptr(), argv.argc(), argv.as_mut_ptr())
        };
        assert_eq!(code, -100);
        assert_eq!(
            api.calls(),
            vec![NativeCall::InitWithArgs(vec!["gs".into(), "-q".into()])]
        );
    }

    #[test]
    fn test_run_string_respects_length_and_writes_exit_code() {
        let api = ScriptedApi::new(915).with_run_exit_code(3);
        let text = b"showpage trailing";
        let mut exit_code = 0;
        let code = unsafe {
            api.run_string_with_length(
                ScriptedApi::instance_ptr(),
                text.as_ptr().cast(),
                8,
                0,
                &mut exit_code,
            )
        };
        assert_eq!(code, 0);
        assert_eq!(exit_code, 3);
        assert_eq!(api.calls(), vec![NativeCall::RunString("showpage".into())]);
    }

    #[test]
    fn test_set_codes_after_sharing() {
        let api = std::sync::Arc::new(ScriptedApi::new(915));
        api.set_run_code(-20);
        let mut exit_code = 0;
        let code =
            unsafe { api.run_file(ScriptedApi::instance_ptr(), c"in.ps".as_ptr(), 0, &mut exit_code) };
        assert_eq!(code, -20);
        assert_eq!(api.count(&NativeCall::RunFile("in.ps".into())), 1);

        api.clear_calls();
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_registry_is_private_unless_process_wide() {
        let api = ScriptedApi::new(915);
        assert!(!std::ptr::eq(api.registry(), InstanceRegistry::global()));
        assert!(!std::ptr::eq(api.registry(), ScriptedApi::new(915).registry()));

        let api = ScriptedApi::new(915).process_wide();
        assert!(std::ptr::eq(api.registry(), InstanceRegistry::global()));
    }

    #[test]
    fn test_with_product_truncates_at_nul() {
        let api = ScriptedApi::new(915).with_product("Custom\0Tail");
        let mut raw = gsapi_revision_t::default();
        let len = std::mem::size_of::<gsapi_revision_t>() as c_int;
        unsafe { api.revision(&mut raw, len) };
        assert_eq!(unsafe { read_c_string(raw.product) }, "Custom");
    }
}
