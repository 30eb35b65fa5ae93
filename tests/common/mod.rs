#![allow(dead_code)]

use ghostscript::native::{NativeApi, ScriptedApi};
use ghostscript::{Ghostscript, GhostscriptBuilder, GsError, InstanceRegistry};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// The argument list from the create/init/exit/destroy scenario.
pub const PDF_WRITE_ARGS: [&str; 5] = [
    "ignored",
    "-q",
    "-dBATCH",
    "-sOutputFile=out.pdf",
    "in.pdf",
];

/// A builder wired to `api`. Each `ScriptedApi` owns its registry, so tests
/// can run in parallel without tripping over the process-wide flag.
pub fn scripted_builder(api: &Arc<ScriptedApi>) -> GhostscriptBuilder {
    Ghostscript::builder().with_shared_api(api.clone())
}

/// Creates an instance and returns it with the registry tracking it.
pub fn create_scripted(
    api: &Arc<ScriptedApi>,
) -> Result<(Ghostscript, &InstanceRegistry), GsError> {
    let gs = scripted_builder(api).build()?;
    Ok((gs, api.registry()))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
