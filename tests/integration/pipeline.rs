//! Cache and catalogue interplay through `Retriever`

use std::fs;
use std::sync::atomic::Ordering;
use std::time::Duration;

use bebb_catalogue::{
    error::FailureKind,
    models::{RecordOrigin, RunMode},
    services::{CacheStore, RetryingClient, Retriever},
};
use tempfile::TempDir;

use crate::support::{marc, number, FakeCatalogue};

fn letter(title: &str) -> Vec<u8> {
    marc(&[("001", &[(' ', "x")]), ("245", &[('a', title)])])
}

fn retriever(dir: &TempDir, catalogue: FakeCatalogue, mode: RunMode) -> Retriever {
    let cache = CacheStore::with_root(dir.path(), "marc", mode.allows_overwrite());
    Retriever::new(cache, Box::new(catalogue), mode)
}

#[tokio::test]
async fn test_fetch_without_cache_creates_entry() {
    let dir = TempDir::new().unwrap();
    let catalogue = FakeCatalogue::new().with_record("123", letter("Letter to Euler"));
    let calls = catalogue.calls();

    let retriever = retriever(&dir, catalogue, RunMode::normal());
    let fetched = retriever.get(&number("123")).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetched.origin, RecordOrigin::Catalogue);
    assert_eq!(
        fs::read(dir.path().join("123.marc")).unwrap(),
        letter("Letter to Euler")
    );
}

#[tokio::test]
async fn test_fetch_with_cache_leaves_it_untouched() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("123.marc"), letter("Cached")).unwrap();
    let catalogue = FakeCatalogue::new().with_record("123", letter("Remote"));
    let calls = catalogue.calls();

    let retriever = retriever(&dir, catalogue, RunMode::normal());
    let fetched = retriever.get(&number("123")).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(fetched.record.get_subfield("245", 'a'), Some("Cached"));
    assert_eq!(fs::read(dir.path().join("123.marc")).unwrap(), letter("Cached"));
}

#[tokio::test]
async fn test_batch_reports_unreachable_number() {
    let dir = TempDir::new().unwrap();
    let catalogue = FakeCatalogue::new().with_record("123", letter("Fine"));

    let retriever = retriever(&dir, catalogue, RunMode::normal());
    let report = retriever.get_all(&[number("123"), number("456")]).await;

    assert_eq!(report.system_numbers(), vec!["123"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].system_number, number("456"));
    assert_eq!(report.failures[0].kind, FailureKind::Connection);
    assert!(!dir.path().join("456.marc").exists());
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let catalogue = FakeCatalogue::new()
        .with_record("1", letter("One"))
        .with_record("2", letter("Two"));
    let calls = catalogue.calls();
    let numbers = [number("1"), number("2")];

    let first = retriever(&dir, catalogue.clone(), RunMode::normal())
        .get_all(&numbers)
        .await;
    assert_eq!(first.from_cache(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let second = retriever(&dir, catalogue, RunMode::normal())
        .get_all(&numbers)
        .await;
    assert_eq!(second.from_cache(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let titles = |report: &bebb_catalogue::models::BatchReport| -> Vec<String> {
        report
            .records
            .iter()
            .filter_map(|r| r.record.get_subfield("245", 'a').map(str::to_string))
            .collect()
    };
    assert_eq!(titles(&first), titles(&second));
}

#[tokio::test]
async fn test_forced_run_refreshes_cache() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("7.marc"), letter("Stale")).unwrap();
    let catalogue = FakeCatalogue::new().with_record("7", letter("Fresh"));
    let calls = catalogue.calls();

    let report = retriever(&dir, catalogue, RunMode::forced())
        .get_all(&[number("7")])
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.from_cache(), 0);
    assert_eq!(fs::read(dir.path().join("7.marc")).unwrap(), letter("Fresh"));
}

#[tokio::test]
async fn test_missing_record_and_corrupt_cache_are_told_apart() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("8.marc"), b"00010nam").unwrap();
    let catalogue = FakeCatalogue::new().without_record("9");

    let report = retriever(&dir, catalogue, RunMode::normal())
        .get_all(&[number("8"), number("9")])
        .await;

    assert!(report.records.is_empty());
    let kinds: Vec<_> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::Format, FailureKind::NoRecord]);
}

#[tokio::test]
async fn test_retries_only_connection_failures() {
    let dir = TempDir::new().unwrap();
    let catalogue = FakeCatalogue::new()
        .with_record("1", letter("One"))
        .without_record("9");
    let calls = catalogue.calls();

    let client = RetryingClient::new(catalogue, Duration::from_secs(5), 1);
    let cache = CacheStore::with_root(dir.path(), "marc", false);
    let retriever = Retriever::new(cache, Box::new(client), RunMode::normal());

    let report = retriever
        .get_all(&[number("1"), number("9"), number("456")])
        .await;

    assert_eq!(report.system_numbers(), vec!["1"]);
    let kinds: Vec<_> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::NoRecord, FailureKind::Connection]);
    // one call each for "1" and "9", two for the unreachable "456"
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}
