use std::env;

fn main() {
    // Surfaced by `pitstop version`
    println!(
        "cargo:rustc-env=PITSTOP_RUSTC_VERSION={}",
        env::var("RUSTC_VERSION").unwrap_or_else(|_| "unknown".to_string())
    );
    println!("cargo:rerun-if-changed=assets/index.html");
}
