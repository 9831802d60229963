//! Map service tests against a real data directory

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use synapsis_core::{from_fn, PipelineError, TextGenerator};
use synapsis_store::{Cleaner, MapService, MapStore, StoreError, DEFAULT_LIST_LIMIT, METADATA_FILE};
use synapsis_test_utils::{
    FailingGenerator, RecordingGenerator, StubGenerator, TopicEchoGenerator, INVALID_NO_TITLE,
};

fn service<G: TextGenerator>(generator: G, dir: &Path, max_maps: usize) -> MapService<G> {
    let store = Arc::new(MapStore::open(dir, max_maps).unwrap());
    MapService::new(generator, store, 64)
}

#[test]
fn test_create_map_renders_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(TopicEchoGenerator, dir.path(), 10);

    let record = service.create_map("  Machine Learning  ").unwrap();

    assert_eq!(record.topic, "Machine Learning");
    assert_eq!(record.file_name, format!("{}.html", record.id));
    assert_eq!(record.path, dir.path().join(&record.file_name));
    assert!(record.size_bytes > 0);
    let document = fs::read_to_string(&record.path).unwrap();
    assert!(document.contains("\"title\":\"Machine Learning\""));
    assert_eq!(service.get_map(&record.id).unwrap(), record);
}

#[test]
fn test_create_map_rejects_bad_topics() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(TopicEchoGenerator, dir.path(), 10);

    assert!(matches!(service.create_map("   "), Err(StoreError::InvalidTopic(_))));
    assert!(matches!(service.create_map(&"x".repeat(65)), Err(StoreError::InvalidTopic(_))));
    assert!(service.create_map(&"é".repeat(64)).is_ok());
}

#[test]
fn test_create_map_enforces_limit() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(TopicEchoGenerator, dir.path(), 2);

    service.create_map("A").unwrap();
    service.create_map("B").unwrap();
    let err = service.create_map("C").unwrap_err();

    assert!(matches!(err, StoreError::LimitReached(2)));
    assert_eq!(service.stats().unwrap().total_maps, 2);
}

#[test]
fn test_create_map_passes_style() {
    let dir = tempfile::tempdir().unwrap();
    let generator = RecordingGenerator::new(["title: Styled"]);
    let store = Arc::new(MapStore::open(dir.path(), 10).unwrap());
    let service = MapService::new(&generator, store, 64).with_style("minimal");

    service.create_map("Design").unwrap();

    assert!(generator.prompts()[0].contains("STYLE: minimal"));
}

#[test]
fn test_failed_generation_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let failing = service(FailingGenerator::new("quota exceeded"), dir.path(), 10);
    let invalid = service(StubGenerator::new(INVALID_NO_TITLE), dir.path(), 10);

    let err = failing.create_map("Go").unwrap_err();
    assert!(matches!(err, StoreError::Pipeline(PipelineError::Generation(_))));

    let err = invalid.create_map("Go").unwrap_err();
    match err {
        StoreError::Pipeline(e) => assert_eq!(e.violations().len(), 2),
        other => panic!("expected pipeline error, got {other:?}"),
    }

    assert!(failing.list_maps(DEFAULT_LIST_LIMIT).unwrap().is_empty());
    assert_eq!(html_files(dir.path()), 0);
}

fn html_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "html"))
        .count()
}

#[test]
fn test_concurrent_creates_respect_limit() {
    let dir = tempfile::tempdir().unwrap();
    // Every caller passes the early count check before any of them records.
    let barrier = Barrier::new(3);
    let generator = from_fn(|_: &str| {
        barrier.wait();
        Ok("title: Shared".to_string())
    });
    let service = service(generator, dir.path(), 2);

    let results: Vec<Result<_, StoreError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["A", "B", "C"]
            .into_iter()
            .map(|topic| {
                let service = &service;
                scope.spawn(move || service.create_map(topic))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let stored = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(StoreError::LimitReached(2))))
        .count();
    assert_eq!((stored, refused), (2, 1));
    assert_eq!(service.stats().unwrap().total_maps, 2);
    assert_eq!(html_files(dir.path()), 2);
}

#[test]
fn test_unrecorded_artifact_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let metadata = dir.path().join(METADATA_FILE);
    let generator = from_fn(|_: &str| {
        fs::write(&metadata, "not json").unwrap();
        Ok("title: Lost".to_string())
    });
    let service = service(generator, dir.path(), 10);

    let err = service.create_map("Lost").unwrap_err();

    assert!(matches!(err, StoreError::Metadata { .. }));
    assert_eq!(html_files(dir.path()), 0);
}

#[test]
fn test_delete_and_map_file() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(TopicEchoGenerator, dir.path(), 10);
    let kept = service.create_map("Kept").unwrap();
    let gone = service.create_map("Gone").unwrap();

    assert_eq!(service.map_file(&kept.id).unwrap(), kept.path);

    fs::remove_file(&gone.path).unwrap();
    assert!(matches!(service.map_file(&gone.id), Err(StoreError::FileMissing { .. })));

    service.delete_map(&kept.id).unwrap();
    assert!(!kept.path.exists());
    assert!(matches!(service.delete_map(&kept.id), Err(StoreError::NotFound(_))));
    assert!(matches!(service.get_map(&kept.id), Err(StoreError::NotFound(_))));
}

#[test]
fn test_cleaner_removes_orphans_left_by_service() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(TopicEchoGenerator, dir.path(), 10);
    let record = service.create_map("Temp").unwrap();
    fs::remove_file(&record.path).unwrap();

    let cleaner = Cleaner::new(Arc::clone(service.store()), 30);
    let [expired, orphans] = cleaner.run_once().unwrap();

    assert_eq!(expired.removed, 0);
    assert_eq!(orphans.ids, vec![record.id]);
    assert_eq!(service.stats().unwrap().total_maps, 0);
}
