//! The linked Ghostscript library.

use super::NativeApi;
use ghostscript_sys as sys;
use std::ffi::{c_char, c_int, c_uint, c_void};

/// Forwards every call to `libgs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibGs;

impl LibGs {
    pub fn new() -> Self {
        Self
    }
}

impl NativeApi for LibGs {
    unsafe fn revision(&self, revision: &mut sys::gsapi_revision_t, len: c_int) -> c_int {
        unsafe { sys::gsapi_revision(revision, len) }
    }

    unsafe fn new_instance(&self, instance: &mut *mut c_void, caller_handle: *mut c_void) -> c_int {
        unsafe { sys::gsapi_new_instance(instance, caller_handle) }
    }

    unsafe fn delete_instance(&self, instance: *mut c_void) {
        unsafe { sys::gsapi_delete_instance(instance) }
    }

    unsafe fn init_with_args(
        &self,
        instance: *mut c_void,
        argc: c_int,
        argv: *mut *mut c_char,
    ) -> c_int {
        unsafe { sys::gsapi_init_with_args(instance, argc, argv) }
    }

    unsafe fn run_string_with_length(
        &self,
        instance: *mut c_void,
        text: *const c_char,
        length: c_uint,
        user_errors: c_int,
        exit_code: &mut c_int,
    ) -> c_int {
        unsafe { sys::gsapi_run_string_with_length(instance, text, length, user_errors, exit_code) }
    }

    unsafe fn run_file(
        &self,
        instance: *mut c_void,
        file_name: *const c_char,
        user_errors: c_int,
        exit_code: &mut c_int,
    ) -> c_int {
        unsafe { sys::gsapi_run_file(instance, file_name, user_errors, exit_code) }
    }

    unsafe fn exit(&self, instance: *mut c_void) -> c_int {
        unsafe { sys::gsapi_exit(instance) }
    }

    fn name(&self) -> &'static str {
        "LibGs"
    }
}
