//! Safe bindings to the Ghostscript interpreter API.
//!
//! The interpreter allows one instance per process. [`Ghostscript`] owns that
//! instance and walks it through its lifecycle:
//!
//! ```text
//! create → init → run_string / run_file → exit → destroy
//! ```
//!
//! ```no_run
//! # #[cfg(feature = "libgs")]
//! # fn main() -> Result<(), ghostscript::GsError> {
//! let mut gs = ghostscript::Ghostscript::new()?;
//! gs.init(["gs", "-q", "-dBATCH", "-dNOPAUSE", "-sDEVICE=pdfwrite",
//!          "-sOutputFile=out.pdf", "in.ps"])?;
//! gs.exit()?;
//! gs.destroy();
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "libgs"))]
//! # fn main() {}
//! ```
//!
//! The native library is only linked with the `libgs` feature. Without it,
//! a backend must be supplied through [`GhostscriptBuilder::with_api`], for
//! example [`native::ScriptedApi`].

pub mod code;
pub mod config;
pub mod error;
pub mod instance;
pub mod marshal;
pub mod native;
pub mod registry;
pub mod revision;

pub use ghostscript_sys as sys;

pub use code::{NativeCode, Severity};
pub use config::{
    GhostscriptBuilder, MAX_SUPPORTED_REVISION, MIN_SUPPORTED_REVISION, SupportedRevisions,
};
pub use error::{GsError, Operation};
pub use instance::{Ghostscript, LifecycleState};
pub use registry::InstanceRegistry;
pub use revision::Revision;

#[cfg(feature = "libgs")]
pub use revision::revision;

/// Whether an instance tracked by the global registry currently exists.
pub fn is_instantiated() -> bool {
    InstanceRegistry::global().is_instantiated()
}
