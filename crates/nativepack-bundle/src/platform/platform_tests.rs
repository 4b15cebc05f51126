#![allow(non_snake_case)]

use super::*;
use proptest::prelude::*;
use std::collections::HashSet;
use test_case::test_case;

// ============================================================================
// Platform keys
// ============================================================================

#[test_case("windows-x64", Platform::WindowsX64)]
#[test_case("macos-arm64", Platform::MacosArm64)]
#[test_case("linux-x64", Platform::LinuxX64)]
fn Platform___parse___recognizes_key(key: &str, expected: Platform) {
    assert_eq!(Platform::parse(key), Some(expected));
    assert_eq!(expected.as_str(), key);
}

#[test_case("invalid" ; "unknown word")]
#[test_case("linux-x86_64" ; "rust arch spelling")]
#[test_case("Linux-x64" ; "uppercase os")]
#[test_case(" linux-x64" ; "leading whitespace")]
#[test_case("win32-x64" ; "manifest key")]
#[test_case("linux-arm64" ; "unsupported architecture")]
fn Platform___parse___rejects_unknown_key(key: &str) {
    assert_eq!(Platform::parse(key), None);
}

#[test_case("linux", "x86_64", "linux-x64")]
#[test_case("macos", "aarch64", "macos-arm64")]
#[test_case("windows", "x86_64", "windows-x64")]
#[test_case("freebsd", "riscv64", "freebsd-riscv64")]
fn Platform___key_for___maps_rust_constants(os: &str, arch: &str, expected: &str) {
    assert_eq!(Platform::key_for(os, arch), expected);
}

#[test]
fn Platform___host_key___parses_when_host_is_supported() {
    let key = Platform::host_key();

    if let Some(p) = Platform::parse(&key) {
        assert_eq!(p.as_str(), key);
    }
}

#[test_case(Platform::WindowsX64, "win32-x64")]
#[test_case(Platform::MacosArm64, "darwin-arm64")]
#[test_case(Platform::LinuxX64, "linux-x64")]
fn Platform___manifest_key___follows_host_naming(platform: Platform, expected: &str) {
    assert_eq!(platform.manifest_key(), expected);
}

#[test]
fn Platform___manifest_key___is_unique_per_platform() {
    let keys: HashSet<_> = Platform::all().iter().map(|p| p.manifest_key()).collect();

    assert_eq!(keys.len(), Platform::all().len());
}

#[test]
fn TargetRegistry___library_file_names___are_unique() {
    let registry = TargetRegistry::new("native_example");

    let names: HashSet<_> = registry.iter().map(|t| t.library_file_name()).collect();

    assert_eq!(names.len(), registry.iter().count());
}

// ============================================================================
// Target registry
// ============================================================================

#[test_case("windows-x64", "native_example.dll")]
#[test_case("macos-arm64", "libnative_example.dylib")]
#[test_case("linux-x64", "libnative_example.so")]
fn TargetRegistry___lookup___returns_compiler_file_name(key: &str, expected: &str) {
    let registry = TargetRegistry::new("native_example");

    let target = registry.lookup(key).unwrap();

    assert_eq!(target.library_file_name(), expected);
}

#[test]
fn TargetRegistry___lookup___extension_matches_platform_family() {
    let registry = TargetRegistry::new("native_example");

    for target in registry.iter() {
        let name = target.library_file_name();
        let key = target.platform_key();
        if key.starts_with("windows-") {
            assert!(name.ends_with(".dll"), "{key} -> {name}");
        } else if key.starts_with("macos-") {
            assert!(name.ends_with(".dylib"), "{key} -> {name}");
        } else if key.starts_with("linux-") {
            assert!(name.ends_with(".so"), "{key} -> {name}");
        } else {
            panic!("unexpected platform family: {key}");
        }
    }
}

#[test]
fn TargetRegistry___lookup___unknown_key_is_unsupported_platform() {
    let registry = TargetRegistry::new("native_example");

    let err = registry.lookup("plan9-mips").unwrap_err();

    assert!(matches!(err, BundleError::UnsupportedPlatform(ref k) if k == "plan9-mips"));
}

#[test]
fn TargetRegistry___new___covers_required_platforms() {
    let registry = TargetRegistry::new("native_example");

    for key in ["windows-x64", "macos-arm64", "linux-x64"] {
        assert!(registry.lookup(key).is_ok(), "missing {key}");
    }
    assert_eq!(registry.iter().count(), Platform::all().len());
}

#[test]
fn TargetRegistry___lookup___returns_matching_target() {
    let registry = TargetRegistry::new("demo");

    let target = registry.lookup("macos-arm64").unwrap();

    assert_eq!(target.platform_key(), "macos-arm64");
    assert_eq!(target.native_triple(), "aarch64-apple-darwin");
    assert_eq!(target.manifest_key(), "darwin-arm64");
}

#[test_case(Platform::WindowsX64, "native_example-windows-x64.dll")]
#[test_case(Platform::MacosArm64, "native_example-macos-arm64.dylib")]
#[test_case(Platform::LinuxX64, "native_example-linux-x64.so")]
fn Target___staged_file_name___combines_prefix_key_and_extension(
    platform: Platform,
    expected: &str,
) {
    let registry = TargetRegistry::new("native_example");

    let target = registry.lookup(platform.as_str()).unwrap();

    assert_eq!(target.staged_file_name("native_example"), expected);
}

proptest! {
    /// Staged names keep the compiled library's extension for any prefix.
    #[test]
    fn proptest_staged_name_keeps_extension(prefix in "[a-z][a-z0-9_]{0,20}") {
        let registry = TargetRegistry::new(&prefix);
        for target in registry.iter() {
            let staged = target.staged_file_name(&prefix);
            let compiled = target.library_file_name();
            let staged_ext = staged.rsplit('.').next();
            let compiled_ext = compiled.rsplit('.').next();
            prop_assert_eq!(staged_ext, compiled_ext);
            let expected_start = format!("{}-{}.", prefix, target.platform_key());
            prop_assert!(staged.starts_with(&expected_start));
        }
    }
}
