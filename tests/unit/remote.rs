use std::collections::HashMap;

use futures::executor::block_on;
use futures::future::{self, BoxFuture, FutureExt};

use super::*;

struct MapFetcher(HashMap<&'static str, &'static [u8]>);

impl Fetcher for MapFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, TimelineResult<Vec<u8>>> {
        let out = match self.0.get(url) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => Err(TimelineError::validation(format!("404 {url}"))),
        };
        future::ready(out).boxed()
    }
}

const FEED: &str = r#"{
  "parcela": {"nombre": "Lote 7"},
  "frames": [
    {"año": 2024, "mes": 1, "periodo_texto": "Enero 2024", "imagenes": {"ndvi": null}},
    {"año": 2024, "mes": 2, "periodo_texto": "Febrero 2024", "imagenes": {"ndvi": "/b.png"}}
  ]
}"#;

#[test]
fn feed_client_parses_body() {
    let client = FeedClient::new(MapFetcher(HashMap::from([("/feed", FEED.as_bytes())])));
    let feed = block_on(client.load("/feed")).unwrap();
    assert_eq!(feed.sequence.len(), 2);
    assert_eq!(feed.parcel_name.as_deref(), Some("Lote 7"));
}

#[test]
fn feed_fetch_failure_is_a_feed_load_error() {
    let client = FeedClient::new(MapFetcher(HashMap::new()));
    let err = block_on(client.load("/feed")).unwrap_err();
    assert!(matches!(err, TimelineError::FeedLoad(msg) if msg.contains("404")));
}

#[test]
fn download_fills_index_template() {
    let dl = VideoDownload::new(
        MapFetcher(HashMap::from([("/video?index=ndvi", &b"mp4"[..])])),
        "/video?index={index}",
    )
    .unwrap();
    assert_eq!(dl.url_for("ndmi"), "/video?index=ndmi");
    assert_eq!(block_on(dl.download("ndvi")).unwrap(), b"mp4".to_vec());
    assert!(matches!(
        block_on(dl.download("savi")),
        Err(TimelineError::Export(_))
    ));
}

#[test]
fn template_without_placeholder_is_rejected() {
    assert!(VideoDownload::new(MapFetcher(HashMap::new()), "/video").is_err());
}

#[test]
fn download_to_writes_file() {
    let dir = std::env::temp_dir().join(format!("satlapse-remote-{}", std::process::id()));
    let path = dir.join("out").join("v.mp4");
    let dl = VideoDownload::new(
        MapFetcher(HashMap::from([("/v/ndvi", &b"abcd"[..])])),
        "/v/{index}",
    )
    .unwrap();
    assert_eq!(block_on(dl.download_to("ndvi", &path)).unwrap(), 4);
    assert_eq!(std::fs::read(&path).unwrap(), b"abcd");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn suggested_name_sanitizes_parcel() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(
        suggested_file_name("Lote 7/Norte", "ndvi", date),
        "timeline_Lote_7_Norte_NDVI_2024-03-09.mp4"
    );
}
