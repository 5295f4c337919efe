fn main() {
    println!("cargo:rerun-if-env-changed=EPANET_LIB_DIR");
    if std::env::var_os("CARGO_FEATURE_EPANET").is_none() {
        return;
    }
    if let Some(dir) = std::env::var_os("EPANET_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
}
