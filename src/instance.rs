//! The owned interpreter instance and its lifecycle.

use crate::config::{GhostscriptBuilder, SupportedRevisions};
use crate::error::{GsError, Operation};
use crate::marshal::{CStringArray, NativeBytes, NativeString};
use crate::native::NativeApi;
use crate::revision::Revision;
use ghostscript_sys::gs_error_unknownerror;
use log::{debug, error, info, warn};
use std::ffi::{c_int, c_void};
use std::fmt;
use std::path::Path;
use std::ptr::{self, NonNull};
use std::sync::Arc;

/// Where an instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Allocated, not yet initialized.
    Created,
    /// Initialization was entered. Exit is still owed.
    Initialized,
    Exited,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Exited => "exited",
        };
        f.write_str(name)
    }
}

/// The native instance pointer.
#[derive(Debug)]
struct InstanceHandle(NonNull<c_void>);

// SAFETY: the interpreter keeps no thread affinity; it only forbids
// concurrent use, which `&mut self` on every operation rules out.
unsafe impl Send for InstanceHandle {}

impl InstanceHandle {
    fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// The process's interpreter instance.
///
/// At most one exists per backend registry at a time, which for the linked
/// library means one per process. Dropping it (or calling
/// [`destroy`](Ghostscript::destroy)) exits the interpreter if needed,
/// deletes the native instance and clears the instantiation flag.
pub struct Ghostscript {
    api: Arc<dyn NativeApi>,
    handle: Option<InstanceHandle>,
    state: LifecycleState,
}

impl Ghostscript {
    /// Creates an instance backed by the linked library.
    #[cfg(feature = "libgs")]
    pub fn new() -> Result<Self, GsError> {
        Self::builder().build()
    }

    pub fn builder() -> GhostscriptBuilder {
        GhostscriptBuilder::new()
    }

    pub(crate) fn create(
        api: Arc<dyn NativeApi>,
        supported: SupportedRevisions,
    ) -> Result<Self, GsError> {
        let claim = api.registry().claim()?;

        let revision = Revision::query(api.as_ref())?;
        if !supported.contains(revision.revision) {
            return Err(GsError::UnsupportedRevision {
                revision: revision.revision,
                supported,
            });
        }

        let mut raw = ptr::null_mut();
        let code = unsafe { api.new_instance(&mut raw, ptr::null_mut()) };
        GsError::check(Operation::Create, code)?;
        let handle = NonNull::new(raw).map(InstanceHandle).ok_or(GsError::NonFatal {
            operation: Operation::Create,
            code: gs_error_unknownerror.into(),
        })?;

        claim.commit();
        info!(
            "Created {} instance ({}, revision {})",
            api.name(),
            revision.product,
            revision.revision
        );
        Ok(Self {
            api,
            handle: Some(handle),
            state: LifecycleState::Created,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Initializes the interpreter with `args`. The first argument stands in
    /// for the program name and is ignored by the interpreter.
    ///
    /// A fatal result exits the interpreter before the error is returned.
    pub fn init<I, S>(&mut self, args: I) -> Result<(), GsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_state(Operation::Initialize, &[LifecycleState::Created])?;
        let mut argv = CStringArray::new(args)?;
        if argv.is_empty() {
            return Err(GsError::InvalidArgument(
                "initialization needs at least one argument".to_string(),
            ));
        }

        let instance = self.instance_ptr(Operation::Initialize)?;
        debug!("Initializing with {} arguments", argv.argc());
        let code = unsafe { self.api.init_with_args(instance, argv.argc(), argv.as_mut_ptr()) };
        drop(argv);

        // Entering init obliges an exit, even when it failed.
        self.state = LifecycleState::Initialized;
        self.settle(Operation::Initialize, code).map(|_| ())
    }

    /// Runs PostScript source and returns the interpreter's exit code.
    ///
    /// The bytes are passed with their length, so binary tokens holding NUL
    /// bytes are allowed.
    pub fn run_string(&mut self, text: impl AsRef<[u8]>) -> Result<c_int, GsError> {
        self.expect_state(Operation::RunString, &[LifecycleState::Initialized])?;
        let text = NativeBytes::new(text);
        let length = text.native_len()?;
        let instance = self.instance_ptr(Operation::RunString)?;

        let mut exit_code = 0;
        let code = unsafe {
            self.api
                .run_string_with_length(instance, text.as_ptr(), length, 0, &mut exit_code)
        };
        drop(text);
        self.settle(Operation::RunString, code)?;
        Ok(exit_code)
    }

    /// Runs a PostScript or PDF file and returns the interpreter's exit code.
    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<c_int, GsError> {
        self.expect_state(Operation::RunFile, &[LifecycleState::Initialized])?;
        let path = path.as_ref();
        let file_name = NativeString::from_path(path)?;
        let instance = self.instance_ptr(Operation::RunFile)?;

        debug!("Running file {}", path.display());
        let mut exit_code = 0;
        let code = unsafe {
            self.api
                .run_file(instance, file_name.as_ptr(), 0, &mut exit_code)
        };
        drop(file_name);
        self.settle(Operation::RunFile, code)?;
        Ok(exit_code)
    }

    /// Shuts the interpreter down. A no-op once exited.
    pub fn exit(&mut self) -> Result<(), GsError> {
        if self.state == LifecycleState::Exited {
            return Ok(());
        }
        let instance = self.instance_ptr(Operation::Exit)?;
        let code = unsafe { self.api.exit(instance) };
        self.state = LifecycleState::Exited;
        debug!("Exited interpreter with code {code}");
        GsError::check(Operation::Exit, code).map(|_| ())
    }

    /// Deletes the instance and clears the instantiation flag.
    pub fn destroy(mut self) {
        self.release();
    }

    fn expect_state(
        &self,
        operation: Operation,
        allowed: &[LifecycleState],
    ) -> Result<(), GsError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(GsError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn instance_ptr(&self, operation: Operation) -> Result<*mut c_void, GsError> {
        // Only `release` takes the handle, and it consumes or drops `self`.
        self.handle
            .as_ref()
            .map(InstanceHandle::as_ptr)
            .ok_or(GsError::InvalidState {
                operation,
                state: self.state,
            })
    }

    /// Classifies `code`, exiting first when it is fatal.
    fn settle(&mut self, operation: Operation, code: c_int) -> Result<c_int, GsError> {
        let result = GsError::check(operation, code);
        if let Err(GsError::Fatal { code, .. }) = &result {
            warn!("{operation} returned fatal code {code}; exiting interpreter");
            if let Err(e) = self.exit() {
                warn!("Exit after fatal {operation} failed: {e}");
            }
        }
        result
    }

    fn release(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if self.state == LifecycleState::Initialized {
            warn!("Destroying an initialized interpreter; exiting first");
            let code = unsafe { self.api.exit(handle.as_ptr()) };
            if code < 0 {
                error!("Exit during destroy failed: {}", crate::code::NativeCode(code));
            }
            self.state = LifecycleState::Exited;
        }
        unsafe { self.api.delete_instance(handle.as_ptr()) };
        self.api.registry().release();
        info!("Destroyed {} instance", self.api.name());
    }
}

impl Drop for Ghostscript {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Ghostscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ghostscript")
            .field("api", &self.api.name())
            .field("state", &self.state)
            .field("live", &self.handle.is_some())
            .finish()
    }
}
