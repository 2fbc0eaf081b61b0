mod common;

use common::{correct_index, question_set};
use quiz_engine_rust::{
    quiz::scoring::score,
    storage::result_store::{ResultStore, SqliteResultStore},
    AnswerMap, PassStatus,
};
use tempfile::TempDir;

#[test]
fn sqlite_results_survive_reopening() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.db");

    let answers: AnswerMap = (0..8).map(|q| (q, correct_index(q))).collect();
    let analysis = score(&question_set().with_topic("Compass"), &answers);

    {
        let store = SqliteResultStore::open(&path).unwrap();
        store.save("session-a", &analysis).unwrap();
    }

    let store = SqliteResultStore::open(&path).unwrap();
    let loaded = store.load("session-a").unwrap().expect("stored result");
    assert_eq!(loaded, analysis);
    assert_eq!(loaded.pass_status, PassStatus::Passed);
    assert!(store.load("session-b").unwrap().is_none());
}

#[test]
fn saving_twice_replaces_entry() {
    let dir = TempDir::new().unwrap();
    let store = SqliteResultStore::open(dir.path().join("results.db")).unwrap();

    let first = score(&question_set(), &AnswerMap::new());
    let answers: AnswerMap = (0..10).map(|q| (q, correct_index(q))).collect();
    let second = score(&question_set(), &answers);

    store.save("session-a", &first).unwrap();
    store.save("session-a", &second).unwrap();

    let stored = store.load("session-a").unwrap().expect("stored result");
    assert_eq!(stored.percentage, 100);
    assert_eq!(stored, second);
}
