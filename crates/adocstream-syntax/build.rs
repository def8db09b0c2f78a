use std::fmt::Write as _;
use std::path::Path;

const FIXTURE_DIR: &str = "src/fixtures";

/// Emits a `fixtures` test module with one `#[test]` per `.adoc` document,
/// each checked against the `.trace` file next to it.
fn main() {
    let mut names: Vec<String> = std::fs::read_dir(FIXTURE_DIR)
        .expect("fixture directory is readable")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "adoc"))
        .map(|path| {
            let trace = path.with_extension("trace");
            assert!(trace.exists(), "{} has no expected trace", path.display());
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .expect("fixture names are UTF-8")
                .to_string()
        })
        .collect();
    names.sort();

    let mut code = String::from("mod fixtures {\n    use super::fixture_test;\n");
    for name in &names {
        writeln!(
            code,
            "\n    #[test]\n    fn {name}() {{\n        fixture_test(\"{name}\");\n    }}"
        )
        .expect("writing to a String");
    }
    code.push_str("}\n");

    let out_dir = std::env::var("OUT_DIR").expect("cargo sets OUT_DIR");
    std::fs::write(Path::new(&out_dir).join("fixture_tests.rs"), code)
        .expect("generated tests are writable");

    println!("cargo::rerun-if-changed={FIXTURE_DIR}");
}
