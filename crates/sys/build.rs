use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=GHOSTSCRIPT_LIB_DIR");

    if env::var_os("CARGO_FEATURE_LINK").is_none() {
        return;
    }

    // Non-standard install locations (e.g. a locally built libgs).
    if let Some(dir) = env::var_os("GHOSTSCRIPT_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
}
