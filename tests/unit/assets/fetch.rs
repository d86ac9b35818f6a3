use futures::executor::block_on;

use super::*;

#[test]
fn normalize_strips_dot_segments() {
    assert_eq!(normalize_rel_path("a/./b//c.png").unwrap(), "a/b/c.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
}

#[test]
fn normalize_rejects_traversal_and_empty() {
    assert!(normalize_rel_path("../etc/passwd").is_err());
    assert!(normalize_rel_path("a/../../b").is_err());
    assert!(normalize_rel_path("./").is_err());
    assert!(normalize_rel_path("/abs").is_err());
}

#[test]
fn fs_resolve_accepts_site_absolute_and_file_urls() {
    let f = FsFetcher::new("/srv/media");
    assert_eq!(
        f.resolve("/media/timeline/a.png").unwrap(),
        PathBuf::from("/srv/media/media/timeline/a.png")
    );
    assert_eq!(
        f.resolve("file:///x/y.png").unwrap(),
        PathBuf::from("/srv/media/x/y.png")
    );
    assert!(f.resolve("/media/../secret").is_err());
}

#[test]
fn fs_fetch_reads_and_reports_missing() {
    let dir = std::env::temp_dir().join(format!("satlapse-fetch-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("frame.bin"), b"abc").unwrap();

    let f = FsFetcher::new(&dir);
    assert_eq!(block_on(f.fetch("/frame.bin")).unwrap(), b"abc");
    assert!(block_on(f.fetch("missing.bin")).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn http_resolve_joins_relative_urls() {
    let f = HttpFetcher::with_base("https://example.test/parcels/7/").unwrap();
    assert_eq!(
        f.resolve("timeline.json").unwrap().as_str(),
        "https://example.test/parcels/7/timeline.json"
    );
    assert_eq!(
        f.resolve("/media/a.png").unwrap().as_str(),
        "https://example.test/media/a.png"
    );
    assert_eq!(
        f.resolve("https://cdn.test/x.png").unwrap().as_str(),
        "https://cdn.test/x.png"
    );
    assert!(HttpFetcher::new().resolve("relative.png").is_err());
}
