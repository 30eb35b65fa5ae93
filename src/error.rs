// src/error.rs
use crate::code::NativeCode;
use crate::config::SupportedRevisions;
use crate::instance::LifecycleState;
use std::ffi::c_int;
use std::fmt;
use thiserror::Error;

/// The native call an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Revision,
    Create,
    Initialize,
    RunString,
    RunFile,
    Exit,
    Destroy,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Revision => "revision query",
            Operation::Create => "create",
            Operation::Initialize => "initialize",
            Operation::RunString => "run string",
            Operation::RunFile => "run file",
            Operation::Exit => "exit",
            Operation::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the interpreter bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GsError {
    #[error(
        "revision structure size is incorrect: library expects {expected} bytes, binding passed {actual}"
    )]
    RevisionSizeMismatch { expected: c_int, actual: usize },

    #[error("interpreter revision {revision} is not supported (supported: {supported})")]
    UnsupportedRevision {
        revision: i64,
        supported: SupportedRevisions,
    },

    #[error("an interpreter instance already exists in this process")]
    AlreadyInstantiated,

    #[error("{operation} failed with fatal interpreter error {code}")]
    Fatal { operation: Operation, code: NativeCode },

    #[error("{operation} failed with interpreter error {code}")]
    NonFatal { operation: Operation, code: NativeCode },

    #[error("cannot {operation}: interpreter is {state}")]
    InvalidState {
        operation: Operation,
        state: LifecycleState,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl GsError {
    /// Maps a native code to `Ok` for the success band and to the matching
    /// error variant otherwise.
    pub fn check(operation: Operation, code: impl Into<NativeCode>) -> Result<c_int, GsError> {
        let code = code.into();
        if code.is_success() {
            Ok(code.get())
        } else if code.is_fatal() {
            Err(GsError::Fatal { operation, code })
        } else {
            Err(GsError::NonFatal { operation, code })
        }
    }

    /// The raw native code carried by this error, if any.
    pub fn native_code(&self) -> Option<c_int> {
        match self {
            GsError::RevisionSizeMismatch { expected, .. } => Some(*expected),
            GsError::Fatal { code, .. } | GsError::NonFatal { code, .. } => Some(code.get()),
            _ => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, GsError::Fatal { .. })
    }

    /// The operation that produced a native error.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            GsError::Fatal { operation, .. }
            | GsError::NonFatal { operation, .. }
            | GsError::InvalidState { operation, .. } => Some(*operation),
            GsError::RevisionSizeMismatch { .. } => Some(Operation::Revision),
            GsError::UnsupportedRevision { .. } | GsError::AlreadyInstantiated => {
                Some(Operation::Create)
            }
            _ => None,
        }
    }
}
