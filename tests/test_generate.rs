mod common;

use std::fs;

use chrono::{TimeZone, Utc};
use site_index::generate::process_generate_at;
use site_index::{process_generate, IndexError};

#[test]
fn output_is_byte_identical_across_runs() {
    let site = common::TestSite::new();
    site.page("docs/a.md", "---\ntitle: A\ntags: [x]\n---\nAlpha.")
        .page("docs/b.md", "---\ntitle: B\n---\nBeta.")
        .page("guides/c.md", "---\ntitle: C\n---\nGamma.");

    process_generate(site.config(), &site.request()).unwrap();
    let first = fs::read(site.index_path()).unwrap();

    process_generate(site.config(), &site.request()).unwrap();
    let second = fs::read(site.index_path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn render_failure_leaves_previous_index_untouched() {
    let site = common::TestSite::new();
    site.page("docs/good.md", "---\ntitle: Good\n---\nFine.");
    process_generate(site.config(), &site.request()).unwrap();
    let before = fs::read(site.index_path()).unwrap();

    site.page("docs/broken.md", "---\ntitle: Broken\n---\n{{< tabs >}} oops {{< /tab");
    let err = process_generate(site.config(), &site.request()).unwrap_err();

    match err {
        IndexError::Render { page, .. } => assert_eq!(page, "docs/broken.md"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read(site.index_path()).unwrap(), before);
}

#[test]
fn missing_title_aborts_without_writing() {
    let site = common::TestSite::new();
    site.page("docs/untitled.md", "No front matter here.");

    let err = process_generate(site.config(), &site.request()).unwrap_err();
    assert!(matches!(err, IndexError::MissingField { .. }));
    assert!(!site.index_path().exists());
}

#[test]
fn dry_run_writes_nothing() {
    let site = common::TestSite::new();
    site.page("docs/a.md", "---\ntitle: A\n---\n");

    let mut request = site.request();
    request.dry_run = true;
    let response = process_generate(site.config(), &request).unwrap();

    assert_eq!(response.records.len(), 1);
    assert!(response.output.is_none());
    assert!(!site.index_path().exists());
}

#[test]
fn output_override_and_pretty_print() {
    let site = common::TestSite::new();
    site.page("docs/a.md", "---\ntitle: A\n---\n");

    let mut config = site.config();
    config.search_index.pretty = true;
    let mut request = site.request();
    let custom = site.root().join("static/index/search.json");
    request.output = Some(custom.clone());

    let response = process_generate(config, &request).unwrap();
    assert_eq!(response.output.as_deref(), Some(custom.as_path()));

    let text = fs::read_to_string(&custom).unwrap();
    assert!(text.starts_with("[\n  {"));
    assert!(!site.index_path().exists());
}

#[test]
fn future_and_expired_pages_follow_config() {
    let site = common::TestSite::new();
    site.page("blog/past.md", "---\ntitle: Past\ndate: 2020-01-01\n---\n")
        .page("blog/future.md", "---\ntitle: Future\ndate: 2031-01-01\n---\n")
        .page("blog/expired.md", "---\ntitle: Expired\nexpiryDate: 2021-01-01\n---\n");
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    let response = process_generate_at(site.config(), &site.request(), now).unwrap();
    let titles: Vec<_> = response.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Past"]);

    let mut config = site.config();
    config.build_future = true;
    config.build_expired = true;
    let response = process_generate_at(config, &site.request(), now).unwrap();
    assert_eq!(response.records.len(), 3);
}

#[test]
fn base_url_path_prefixes_urls() {
    let site = common::TestSite::new();
    site.page("guides/setup.md", "---\ntitle: Setup\n---\n");

    let mut config = site.config();
    config.base_url = "https://example.com/docs/".into();
    let response = process_generate(config, &site.request()).unwrap();
    assert_eq!(response.records[0].url, "/docs/guides/setup/");
}
