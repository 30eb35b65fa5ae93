//! Backends that drive the real library share the process-wide registry.
//!
//! Everything here touches the global flag, so this file holds one test.

use ghostscript::native::{NativeApi, ScriptedApi};
use ghostscript::{Ghostscript, GsError, InstanceRegistry};
use std::sync::Arc;

#[test]
fn test_process_wide_backends_share_one_instance_slot() {
    let first = Arc::new(ScriptedApi::new(915).process_wide());
    let second = Arc::new(ScriptedApi::new(915).process_wide());
    assert!(std::ptr::eq(first.registry(), InstanceRegistry::global()));
    assert!(!ghostscript::is_instantiated());

    let gs = Ghostscript::builder()
        .with_shared_api(first.clone())
        .build()
        .unwrap();
    assert!(ghostscript::is_instantiated());

    // A different backend object cannot open a second slot.
    let err = Ghostscript::builder()
        .with_shared_api(second.clone())
        .build()
        .unwrap_err();
    assert_eq!(err, GsError::AlreadyInstantiated);
    assert_eq!(first.live_instances() + second.live_instances(), 1);

    // A backend with its own registry leaves the global flag alone.
    let private = Arc::new(ScriptedApi::new(915));
    let other = Ghostscript::builder()
        .with_shared_api(private.clone())
        .build()
        .unwrap();
    assert!(ghostscript::is_instantiated());
    other.destroy();
    assert!(ghostscript::is_instantiated());

    gs.destroy();
    assert!(!ghostscript::is_instantiated());

    let gs = Ghostscript::builder()
        .with_shared_api(second.clone())
        .build()
        .unwrap();
    gs.destroy();
    assert_eq!(second.live_instances(), 0);
}
