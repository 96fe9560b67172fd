// Shared build script helper for README-to-rustdoc generation.
// Include from a crate build.rs with: include!("../build_common.rs");
//
// The including file must import:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Rewrite a crate's README.md so rustdoc can use it as the crate-level doc.
///
/// Source links of the form `](src/foo.rs)` become `](foo)` so they resolve
/// to rustdoc module pages instead of files. The processed text is written to
/// `$OUT_DIR/README_GENERATED.md`, which lib.rs pulls in with `include_str!`.
fn process_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");

    let readme_path = Path::new(crate_dir).join("README.md");
    let Ok(content) = fs::read_to_string(&readme_path) else {
        return; // No README, nothing to generate
    };

    let rustdoc_content = content.replace("](src/", "](").replace(".rs)", ")");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");
    fs::write(dest_path, rustdoc_content).unwrap();
}
