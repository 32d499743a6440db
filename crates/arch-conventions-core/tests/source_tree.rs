//! Integration test: importing a real source tree and checking it end-to-end.
//!
//! The `shop` fixture under `tests/fixtures/` is a small crate layout with
//! domain, infrastructure and test sources.

use arch_conventions_core::{
    load_rules_from_toml, ClassModelCache, ClassModelProvider, Engine, ImportError, ImportScope,
    Namespace, Severity, SourceTreeProvider, TypeKind,
};
use std::path::PathBuf;
use std::sync::Arc;

fn shop_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop")
}

fn shop() -> SourceTreeProvider {
    SourceTreeProvider::new(shop_root(), "shop")
}

fn ns(path: &str) -> Namespace {
    Namespace::new(path).unwrap()
}

// ── Import ──

#[test]
fn imports_non_test_types_by_default() {
    let model = shop()
        .import_classes(&ns("shop"), ImportScope::ExcludeTests)
        .unwrap();

    let mut names: Vec<&str> = model.iter().map(|t| t.full_name()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "shop::AppConfig",
            "shop::domain::CustomerId",
            "shop::domain::order::Order",
            "shop::domain::order::OrderRepository",
            "shop::domain::order::OrderStatus",
            "shop::infra::Connection",
            "shop::infra::repository_impl::ConnectionPool",
            "shop::infra::repository_impl::SqlOrderRepositoryImpl",
        ]
    );
}

#[test]
fn tests_only_scope_finds_inline_and_integration_tests() {
    let model = shop()
        .import_classes(&ns("shop"), ImportScope::TestsOnly)
        .unwrap();

    let mut names: Vec<&str> = model.iter().map(|t| t.full_name()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "shop::domain::order::tests::InMemoryOrders",
            "shop::tests::orders_test::OrderHarness",
        ]
    );
}

#[test]
fn records_kind_visibility_derives_and_location() {
    let model = shop()
        .import_classes(&ns("shop"), ImportScope::IncludeTests)
        .unwrap();
    assert_eq!(model.len(), 10);

    let status = model.get("shop::domain::order::OrderStatus").unwrap();
    assert_eq!(status.kind(), TypeKind::Enum);
    assert!(status.is_public());
    assert!(status.derives_trait("Copy"));

    let alias = model.get("shop::infra::Connection").unwrap();
    assert_eq!(alias.kind(), TypeKind::TypeAlias);

    let pool = model
        .get("shop::infra::repository_impl::ConnectionPool")
        .unwrap();
    assert!(!pool.is_public());

    let repo = model
        .get("shop::infra::repository_impl::SqlOrderRepositoryImpl")
        .unwrap();
    let location = repo.location().unwrap();
    assert_eq!(location.file, PathBuf::from("src/infra/repository_impl.rs"));
    assert_eq!(location.line, 3);
    assert_eq!(location.column, 12);
}

#[test]
fn namespace_slices_by_module_prefix() {
    let model = shop()
        .import_classes(&ns("shop::domain"), ImportScope::ExcludeTests)
        .unwrap();

    assert_eq!(model.len(), 4);
    assert!(model.iter().all(|t| t.full_name().starts_with("shop::domain::")));
}

// ── End-to-end ──

#[test]
fn declarative_rules_flag_impl_suffix() {
    let rules = load_rules_from_toml(
        r#"
[[rules]]
name = "no-impl-suffix"
code = "AC901"
must-not-match = ".*Impl"
message = "name the concept, not the implementation"
"#,
    )
    .unwrap();

    let err = Engine::builder()
        .namespace(ns("shop"))
        .provider(Arc::new(shop()))
        .rules(rules)
        .build()
        .check()
        .unwrap_err();

    let violation = err.as_violation().unwrap();
    assert_eq!(violation.rule(), "no-impl-suffix");
    assert_eq!(violation.violations().len(), 1);

    let found = &violation.violations()[0];
    assert_eq!(
        found.type_name,
        "shop::infra::repository_impl::SqlOrderRepositoryImpl"
    );
    assert_eq!(found.code, "AC901");
    assert!(found.message.ends_with("name the concept, not the implementation"));
    assert!(found.location.is_some());
}

#[test]
fn warnings_are_reported_without_failing() {
    let rules = load_rules_from_toml(
        r#"
[[rules]]
name = "domain-derives-debug"
namespace = "shop::domain"
must-derive = "Debug"
severity = "warning"
"#,
    )
    .unwrap();

    let summary = Engine::builder()
        .namespace(ns("shop"))
        .provider(Arc::new(shop()))
        .rules(rules)
        .build()
        .check()
        .unwrap();

    assert_eq!(summary.rules_checked, 1);
    assert_eq!(summary.types_evaluated, 4);
    assert_eq!(summary.findings.len(), 1);
    assert_eq!(
        summary.findings[0].type_name,
        "shop::domain::order::OrderRepository"
    );
    assert_eq!(summary.findings[0].severity, Severity::Warning);
}

#[test]
fn exclusions_silence_known_offenders() {
    let rules = load_rules_from_toml(
        r#"
[[rules]]
name = "no-impl-suffix"
must-not-match = ".*Impl"
exclude = ["shop::infra::repository_impl::SqlOrderRepositoryImpl"]
"#,
    )
    .unwrap();

    let summary = Engine::builder()
        .namespace(ns("shop"))
        .provider(Arc::new(shop()))
        .rules(rules)
        .build()
        .check()
        .unwrap();

    assert!(summary.is_clean());
    assert_eq!(summary.types_evaluated, 7);
}

// ── Failure handling ──

#[test]
fn unparsable_files_are_skipped_unless_strict() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/lib.rs"), "pub struct Fine;\n").unwrap();
    std::fs::write(dir.path().join("src/broken.rs"), "pub struct {\n").unwrap();

    let lenient = SourceTreeProvider::new(dir.path(), "pkg");
    let model = lenient
        .import_classes(&ns("pkg"), ImportScope::ExcludeTests)
        .unwrap();
    assert_eq!(model.len(), 1);

    let strict = SourceTreeProvider::new(dir.path(), "pkg").fail_on_parse_error(true);
    let err = strict
        .import_classes(&ns("pkg"), ImportScope::ExcludeTests)
        .unwrap_err();
    assert!(matches!(err, ImportError::Parse { .. }));
}

#[test]
fn failed_imports_are_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/lib.rs"), "pub struct {\n").unwrap();

    let provider = SourceTreeProvider::new(dir.path(), "pkg").fail_on_parse_error(true);
    let cache = ClassModelCache::new(Arc::new(provider));

    assert!(cache.from(&ns("pkg"), ImportScope::ExcludeTests).is_err());
    assert!(cache.is_empty());

    std::fs::write(dir.path().join("src/lib.rs"), "pub struct Fixed;\n").unwrap();
    let model = cache.from(&ns("pkg"), ImportScope::ExcludeTests).unwrap();
    assert_eq!(model.len(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn gitignored_sources_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src/generated")).unwrap();
    std::fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();
    std::fs::write(dir.path().join("src/lib.rs"), "pub struct Kept;\n").unwrap();
    std::fs::write(
        dir.path().join("src/generated/mod.rs"),
        "pub struct Ignored;\n",
    )
    .unwrap();

    let respecting = SourceTreeProvider::new(dir.path(), "pkg")
        .import_classes(&ns("pkg"), ImportScope::ExcludeTests)
        .unwrap();
    assert!(respecting.contains("pkg::Kept"));
    assert!(!respecting.contains("pkg::generated::Ignored"));

    let everything = SourceTreeProvider::new(dir.path(), "pkg")
        .respect_gitignore(false)
        .import_classes(&ns("pkg"), ImportScope::ExcludeTests)
        .unwrap();
    assert!(everything.contains("pkg::generated::Ignored"));
}

#[test]
fn crate_under_vendor_directory_is_still_imported() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("vendor/shop");
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("target/debug")).unwrap();
    std::fs::write(root.join("src/lib.rs"), "pub struct Order;\n").unwrap();
    std::fs::write(root.join("target/debug/gen.rs"), "pub struct Gen;\n").unwrap();

    let model = SourceTreeProvider::new(&root, "shop")
        .import_classes(&ns("shop"), ImportScope::ExcludeTests)
        .unwrap();
    assert_eq!(model.len(), 1);
    assert!(model.contains("shop::Order"));
}
