// tests/history_persistence.rs
//
// History survives a restart through its JSON file; bad files never block startup.

use std::fs;
use std::sync::Arc;

use fake_news_analyzer::analyze::fact_check::DisabledFactChecker;
use fake_news_analyzer::clock::{FixedJitter, SystemClock};
use fake_news_analyzer::history::History;
use fake_news_analyzer::{AnalysisResult, FakeNewsAnalyzer, Verdict};

fn analyzer() -> FakeNewsAnalyzer {
    FakeNewsAnalyzer::new(
        Arc::new(DisabledFactChecker),
        Arc::new(SystemClock),
        Arc::new(FixedJitter::zero()),
    )
}

#[tokio::test]
async fn roundtrip_through_file_keeps_order_and_timestamps() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("nested").join("history.json");
    let a = analyzer();

    let h = History::load(&path, 10);
    assert!(h.is_empty());
    h.push(a.analyze("BREAKING: Scientists SHOCKING discovery!!! You won't believe what happens next!").await);
    h.push(a.analyze("The council met today.").await);
    let before = h.snapshot();

    assert!(path.exists(), "saved after push");
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let ts = raw[0]["created_at"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "ISO-8601: {ts}");

    let reloaded = History::load(&path, 10);
    let after = reloaded.snapshot();
    assert_eq!(after.len(), before.len());
    for (a, b) in after.iter().zip(before.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.created_at, b.created_at);
        assert_eq!(a.reasons, b.reasons);
        assert_eq!(a.emotional, b.emotional);
    }
    assert_eq!(after[0].verdict, Verdict::Uncertain);
    assert_eq!(after[1].verdict, Verdict::Fake);
}

#[tokio::test]
async fn reload_truncates_to_capacity() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("history.json");
    let a = analyzer();

    let h = History::load(&path, 10);
    for i in 0..10 {
        h.push(a.analyze(&format!("Item number {i} in the feed")).await);
    }

    let small = History::load(&path, 3);
    let snap = small.snapshot();
    assert_eq!(snap.len(), 3);
    assert_eq!(snap[0].text, "Item number 9 in the feed");
}

#[test]
fn corrupt_file_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("history.json");
    fs::write(&path, "{ not json").unwrap();

    let h = History::load(&path, 10);
    assert!(h.is_empty());
}

#[test]
fn clear_persists_empty_list() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("history.json");
    fs::write(&path, "[]").unwrap();

    let h = History::load(&path, 10);
    h.clear();
    let back: Vec<AnalysisResult> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(back.is_empty());
}

#[tokio::test]
async fn concurrent_pushes_leave_file_matching_memory() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("history.json");
    let a = analyzer();

    let mut batches = Vec::new();
    for t in 0..8 {
        let mut batch = Vec::new();
        for i in 0..5 {
            batch.push(a.analyze(&format!("Thread {t} item {i} in the feed")).await);
        }
        batches.push(batch);
    }

    let h = Arc::new(History::load(&path, 10));
    let handles: Vec<_> = batches
        .into_iter()
        .map(|batch| {
            let h = Arc::clone(&h);
            std::thread::spawn(move || {
                for r in batch {
                    h.push(r);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mem: Vec<_> = h.snapshot().into_iter().map(|r| r.id).collect();
    let disk: Vec<_> = History::load(&path, 10)
        .snapshot()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(mem.len(), 10);
    assert_eq!(disk, mem);
    assert!(!path.with_extension("json.tmp").exists());
}
