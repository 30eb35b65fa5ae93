//! Library self-reported version metadata.

use crate::error::GsError;
use crate::marshal::read_c_string;
use crate::native::NativeApi;
use ghostscript_sys::gsapi_revision_t;
use log::debug;
use serde::Serialize;
use std::ffi::c_int;
use std::fmt;
use std::mem::size_of;

/// Version information reported by the interpreter library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub product: String,
    pub copyright: String,
    pub revision: i64,
    /// Release date as `YYYYMMDD`.
    pub revision_date: i64,
}

impl Revision {
    /// Asks `api` for its revision. Needs no instance and never touches the
    /// instantiation flag.
    pub fn query(api: &dyn NativeApi) -> Result<Revision, GsError> {
        let mut raw = gsapi_revision_t::default();
        let size = size_of::<gsapi_revision_t>();
        // The struct is four words; this cannot truncate.
        let code = unsafe { api.revision(&mut raw, size as c_int) };
        if code != 0 {
            return Err(GsError::RevisionSizeMismatch {
                expected: code,
                actual: size,
            });
        }

        // The strings are static data inside the library. Copy them out
        // before anything else can run.
        let revision = Revision {
            product: unsafe { read_c_string(raw.product) },
            copyright: unsafe { read_c_string(raw.copyright) },
            revision: i64::from(raw.revision),
            revision_date: i64::from(raw.revisiondate),
        };
        debug!(
            "{} reports {} revision {}",
            api.name(),
            revision.product,
            revision.revision
        );
        Ok(revision)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.product, self.revision, self.revision_date
        )
    }
}

/// Queries the linked library.
#[cfg(feature = "libgs")]
pub fn revision() -> Result<Revision, GsError> {
    Revision::query(&crate::native::LibGs::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{NativeCall, ScriptedApi};

    #[test]
    fn test_query_reads_scripted_revision() {
        let api = ScriptedApi::new(914).with_revision_date(20140922);
        let rev = Revision::query(&api).unwrap();
        assert_eq!(rev.product, "GPL Ghostscript");
        assert_eq!(rev.revision, 914);
        assert_eq!(rev.revision_date, 20140922);
        assert!(rev.copyright.contains("Artifex"));
        assert_eq!(api.calls(), vec![NativeCall::Revision]);
    }

    #[test]
    fn test_size_mismatch_reports_both_sizes() {
        let api = ScriptedApi::new(914).with_revision_size_mismatch(48);
        let err = Revision::query(&api).unwrap_err();
        assert_eq!(
            err,
            GsError::RevisionSizeMismatch {
                expected: 48,
                actual: size_of::<gsapi_revision_t>(),
            }
        );
    }

    #[test]
    fn test_display() {
        let rev = Revision {
            product: "GPL Ghostscript".into(),
            copyright: String::new(),
            revision: 915,
            revision_date: 20140325,
        };
        assert_eq!(rev.to_string(), "GPL Ghostscript 915 (20140325)");
    }

    #[test]
    fn test_serializes_to_json() {
        let rev = Revision {
            product: "GPL Ghostscript".into(),
            copyright: "c".into(),
            revision: 912,
            revision_date: 20130807,
        };
        let json = serde_json::to_value(&rev).unwrap();
        assert_eq!(json["revision"], 912);
        assert_eq!(json["revision_date"], 20130807);
    }
}
