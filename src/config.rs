// src/config.rs
use crate::error::GsError;
use crate::instance::Ghostscript;
use crate::native::NativeApi;
use std::fmt;
use std::sync::Arc;

/// Oldest interpreter revision the bindings are known to work with.
pub const MIN_SUPPORTED_REVISION: i64 = 910;
/// Newest interpreter revision the bindings are known to work with.
pub const MAX_SUPPORTED_REVISION: i64 = 915;

/// An inclusive window of interpreter revisions accepted at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedRevisions {
    min: i64,
    max: i64,
}

impl SupportedRevisions {
    /// A window from `min` to `max`, both inclusive. Swapped bounds are
    /// reordered.
    pub fn new(min: i64, max: i64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, revision: i64) -> bool {
        (self.min..=self.max).contains(&revision)
    }
}

impl Default for SupportedRevisions {
    fn default() -> Self {
        Self::new(MIN_SUPPORTED_REVISION, MAX_SUPPORTED_REVISION)
    }
}

impl fmt::Display for SupportedRevisions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Configures and creates a [`Ghostscript`] instance.
///
/// The single-instance rule is enforced by the backend's
/// [`registry`](NativeApi::registry), which for the linked library is always
/// the process-wide one.
///
/// # Example
///
/// ```
/// use ghostscript::Ghostscript;
/// use ghostscript::native::ScriptedApi;
/// use std::sync::Arc;
///
/// let api = Arc::new(ScriptedApi::new(912));
/// let gs = Ghostscript::builder()
///     .with_shared_api(api.clone())
///     .build()
///     .unwrap();
/// assert!(api.is_instantiated());
/// gs.destroy();
/// assert!(!api.is_instantiated());
/// ```
pub struct GhostscriptBuilder {
    api: Option<Arc<dyn NativeApi>>,
    supported: SupportedRevisions,
}

impl GhostscriptBuilder {
    pub fn new() -> Self {
        Self {
            api: None,
            supported: SupportedRevisions::default(),
        }
    }

    /// Sets the native backend.
    pub fn with_api(mut self, api: impl NativeApi + 'static) -> Self {
        self.api = Some(Arc::new(api));
        self
    }

    /// Sets a backend the caller keeps a handle to, e.g. to inspect a
    /// [`ScriptedApi`](crate::native::ScriptedApi) afterwards.
    pub fn with_shared_api(mut self, api: Arc<dyn NativeApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn with_supported_revisions(mut self, supported: SupportedRevisions) -> Self {
        self.supported = supported;
        self
    }

    /// Creates the instance. Falls back to the linked library when no
    /// backend was set and the `libgs` feature is enabled.
    pub fn build(self) -> Result<Ghostscript, GsError> {
        let api = match self.api {
            Some(api) => api,
            None => default_api()?,
        };
        Ghostscript::create(api, self.supported)
    }
}

impl Default for GhostscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GhostscriptBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostscriptBuilder")
            .field("api", &self.api.as_ref().map(|a| a.name()))
            .field("supported", &self.supported)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "libgs")]
fn default_api() -> Result<Arc<dyn NativeApi>, GsError> {
    Ok(Arc::new(crate::native::LibGs::new()))
}

#[cfg(not(feature = "libgs"))]
fn default_api() -> Result<Arc<dyn NativeApi>, GsError> {
    Err(GsError::Config(
        "no native interpreter backend configured; enable the `libgs` feature or call `with_api`"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_inclusive() {
        let window = SupportedRevisions::default();
        assert!(window.contains(910));
        assert!(window.contains(915));
        assert!(!window.contains(909));
        assert!(!window.contains(916));
        assert_eq!(window.to_string(), "910..=915");
    }

    #[test]
    fn test_swapped_bounds_are_reordered() {
        let window = SupportedRevisions::new(920, 900);
        assert_eq!(window.min(), 900);
        assert_eq!(window.max(), 920);
    }

    #[cfg(not(feature = "libgs"))]
    #[test]
    fn test_build_without_backend_is_config_error() {
        let err = GhostscriptBuilder::new().build().unwrap_err();
        assert!(matches!(err, GsError::Config(_)));
    }
}
