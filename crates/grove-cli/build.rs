fn main() {
    // Default target of `grove build` when --target is not given.
    let target = std::env::var("TARGET").unwrap_or_default();
    println!("cargo::rustc-env=GROVE_HOST_TRIPLE={target}");
    println!("cargo::rerun-if-changed=build.rs");
}
