fn main() {
    // Shown in the page footer
    let built_on = chrono::Utc::now().format("%Y-%m-%d");
    println!("cargo:rustc-env=BUILD_TIME={built_on}");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=content");
}
