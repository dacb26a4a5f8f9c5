use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::DateTime;

use formdesk_admin::DeleteSubmissionsJob;
use formdesk_store::{SubmissionStore, UserOptionsStore};

const FORM_ID: u64 = 1;
const USER: u64 = 1;

fn temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("formdesk_job_{tag}_{stamp}"));
    dir
}

fn seeded_store(count: usize) -> (SubmissionStore, Vec<u64>) {
    let mut store = SubmissionStore::new();
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let created = DateTime::from_timestamp(i as i64, 0).unwrap_or_default();
        ids.push(store.insert(FORM_ID, BTreeMap::new(), created));
    }
    (store, ids)
}

#[test]
fn job_sizes_steps_from_count() {
    let dir = temp_dir("sizing");
    let options = UserOptionsStore::new(&dir).expect("options");
    let (store, _) = seeded_store(620);

    let mut job = DeleteSubmissionsJob::new(FORM_ID, USER, "subs.csv", "/subs?form_id=1");
    let report = job.loading(&store, &options).expect("loading");

    assert!(!report.complete);
    // round(620 / 250) + 2
    assert_eq!(report.total_steps, 4);
    assert_eq!(
        job.redirect_target.as_deref(),
        Some("/subs?form_id=1&download_all=subs.csv")
    );
    assert_eq!(
        job.stored_filename(&options).expect("filename"),
        Some("subs.csv".to_string())
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn driving_all_steps_deletes_everything_then_clears_progress() {
    let dir = temp_dir("drive");
    let options = UserOptionsStore::new(&dir).expect("options");
    let (mut store, mut expected_ids) = seeded_store(620);

    let mut job = DeleteSubmissionsJob::new(FORM_ID, USER, "subs.csv", "/subs");
    let report = job.loading(&store, &options).expect("loading");

    for _ in 0..report.total_steps {
        job.step(&mut store, &options).expect("step");
    }
    assert_eq!(store.len(), 0);

    let mut processed = job.processed_ids(&options).expect("processed");
    let before_dedupe = processed.len();
    processed.sort_unstable();
    processed.dedup();
    assert_eq!(processed.len(), before_dedupe, "no duplicate ids recorded");
    expected_ids.sort_unstable();
    assert_eq!(processed, expected_ids);

    job.complete(&options).expect("complete");
    assert!(job.processed_ids(&options).expect("processed").is_empty());
    assert_eq!(job.stored_filename(&options).expect("filename"), None);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_page_is_steady_state_not_an_error() {
    let dir = temp_dir("empty");
    let options = UserOptionsStore::new(&dir).expect("options");
    let (mut store, _) = seeded_store(0);

    let mut job = DeleteSubmissionsJob::new(FORM_ID, USER, "subs.csv", "/subs");
    job.loading(&store, &options).expect("loading");
    let report = job.step(&mut store, &options).expect("step");
    assert!(report.deleted.is_empty());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_form_completes_immediately() {
    let dir = temp_dir("noform");
    let options = UserOptionsStore::new(&dir).expect("options");
    let store = SubmissionStore::new();

    let mut job = DeleteSubmissionsJob::new(0, USER, "subs.csv", "/subs");
    let report = job.loading(&store, &options).expect("loading");
    assert!(report.complete);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn retried_step_does_not_duplicate_progress() {
    let dir = temp_dir("retry");
    let options = UserOptionsStore::new(&dir).expect("options");
    let (mut store, ids) = seeded_store(10);

    let mut job = DeleteSubmissionsJob::new(FORM_ID, USER, "subs.csv", "/subs");
    job.loading(&store, &options).expect("loading");
    job.step(&mut store, &options).expect("first step");
    // A retry after everything in the page was already deleted.
    job.step(&mut store, &options).expect("retried step");

    let processed = job.processed_ids(&options).expect("processed");
    assert_eq!(processed.len(), ids.len());

    let _ = fs::remove_dir_all(&dir);
}
