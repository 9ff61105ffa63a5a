//! Path resolution precedence tests against real directory layouts.

mod common;

use common::*;
use filegraph_core::phases::resolution::{PathResolver, Resolution};
use pretty_assertions::assert_eq;

fn resolve(dir: &tempfile::TempDir, from: &str, specifier: &str) -> Resolution {
    let root = canonical(dir);
    PathResolver::new("js").resolve(&root.join(from), specifier)
}

#[test]
fn exact_file_wins_over_extension() {
    let dir = temp_project(&[("a.js", ""), ("b", ""), ("b.js", "")]);
    assert_eq!(
        resolve(&dir, "a.js", "./b"),
        Resolution::Resolved(canonical(&dir).join("b"))
    );
}

#[test]
fn extension_wins_over_index() {
    let dir = temp_project(&[("a.js", ""), ("b.js", ""), ("b/index.js", "")]);
    assert_eq!(
        resolve(&dir, "a.js", "./b"),
        Resolution::Resolved(canonical(&dir).join("b.js"))
    );
}

#[test]
fn directory_falls_back_to_index() {
    let dir = temp_project(&[("a.js", ""), ("lib/index.js", "")]);
    assert_eq!(
        resolve(&dir, "a.js", "./lib"),
        Resolution::Resolved(canonical(&dir).join("lib/index.js"))
    );
}

#[test]
fn explicit_extension_resolves_exactly() {
    let dir = temp_project(&[("a.js", ""), ("b.js", "")]);
    assert_eq!(
        resolve(&dir, "a.js", "./b.js"),
        Resolution::Resolved(canonical(&dir).join("b.js"))
    );
}

#[test]
fn parent_segments_are_collapsed() {
    let dir = temp_project(&[("src/deep/a.js", ""), ("lib/util.js", "")]);
    assert_eq!(
        resolve(&dir, "src/deep/a.js", "../../lib/./util"),
        Resolution::Resolved(canonical(&dir).join("lib/util.js"))
    );
}

#[test]
fn directory_without_index_is_unresolved() {
    let dir = temp_project(&[("a.js", ""), ("lib/other.js", "")]);
    let resolution = resolve(&dir, "a.js", "./lib");
    assert!(!resolution.is_resolved());
    assert_eq!(resolution.path(), canonical(&dir).join("lib"));
}

#[test]
fn missing_target_is_unresolved() {
    let dir = temp_project(&[("a.js", "")]);
    let resolution = resolve(&dir, "a.js", "./nowhere");
    assert_eq!(
        resolution,
        Resolution::Unresolved(canonical(&dir).join("nowhere"))
    );
}

#[test]
fn other_extension_probes_its_own_suffix() {
    let dir = temp_project(&[("a.mjs", ""), ("b.mjs", ""), ("b.js", "")]);
    let root = canonical(&dir);
    let resolution = PathResolver::new(".mjs").resolve(&root.join("a.mjs"), "./b");
    assert_eq!(resolution, Resolution::Resolved(root.join("b.mjs")));
}

#[test]
fn trailing_slash_skips_sibling_file() {
    let dir = temp_project(&[("a.js", ""), ("b.js", ""), ("b/other.js", "")]);
    let resolution = resolve(&dir, "a.js", "./b/");
    assert_eq!(resolution, Resolution::Unresolved(canonical(&dir).join("b")));
}

#[test]
fn trailing_slash_uses_index() {
    let dir = temp_project(&[("a.js", ""), ("b.js", ""), ("b/index.js", "")]);
    assert_eq!(
        resolve(&dir, "a.js", "./b/"),
        Resolution::Resolved(canonical(&dir).join("b/index.js"))
    );
}

#[test]
fn dot_specifier_resolves_own_directory_index() {
    let dir = temp_project(&[("src.js", ""), ("src/a.js", ""), ("src/index.js", "")]);
    assert_eq!(
        resolve(&dir, "src/a.js", "."),
        Resolution::Resolved(canonical(&dir).join("src/index.js"))
    );
}

#[test]
fn dot_dot_specifier_skips_sibling_file() {
    let dir = temp_project(&[("lib.js", ""), ("lib/src/a.js", "")]);
    let resolution = resolve(&dir, "lib/src/a.js", "..");
    assert!(!resolution.is_resolved());
    assert_eq!(resolution.path(), canonical(&dir).join("lib"));
}
