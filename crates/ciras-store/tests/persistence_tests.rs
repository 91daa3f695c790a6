use ciras_model::{Category, CommentDraft, IssueDraft, IssueStatus, User};
use ciras_store::storage::{FileStorage, MemoryStorage, Storage, WriteBehindStorage};
use ciras_store::store::{decode_issues, encode_issues};
use ciras_store::{IssueStore, StorageError, StoreConfig};
use ciras_test_utils::*;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Storage whose writes always fail
#[derive(Debug, Default)]
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::io_error(key, std::io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Storage that holds its first write until released
#[derive(Debug)]
struct StallFirstWrite {
    inner: MemoryStorage,
    writes: AtomicUsize,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl Storage for StallFirstWrite {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.writes.fetch_add(1, Ordering::SeqCst) == 0 {
            let _ = self.entered.lock().send(());
            let _ = self.release.lock().recv_timeout(Duration::from_secs(5));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[test]
fn test_concurrent_mutations_persist_in_order() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let storage = Arc::new(StallFirstWrite {
        inner: MemoryStorage::new(),
        writes: AtomicUsize::new(0),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    });
    let store = Arc::new(IssueStore::open(storage.clone(), StoreConfig::new()));

    let first = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.add_issue(hostel_draft(), None))
    };
    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    let second = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.add_issue(anonymous_draft(), None))
    };
    // give the second mutation time to reach storage before the first write lands
    thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();
    first.join().unwrap();
    second.join().unwrap();

    assert_eq!(store.len(), 2);
    let persisted = decode_issues(&storage.inner.get("ciras-issues").unwrap().unwrap()).unwrap();
    assert_eq!(persisted.len(), 2);
}

#[test]
fn test_reopen_from_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let admin = admin();

    let (id, deadline) = {
        let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
        let store = IssueStore::open(storage, StoreConfig::new());
        let issue = store.add_issue(hostel_draft(), Some(&student()));
        store.assign_issue_to_department(&issue.id, "Student Affairs", &admin).unwrap();
        let deadline = epoch();
        store.set_deadline(&issue.id, deadline, &admin).unwrap();
        store.add_comment(&issue.id, CommentDraft::by(&admin, "On it")).unwrap();
        store.update_issue_status(&issue.id, IssueStatus::Resolved, &admin).unwrap();
        assert_eq!(store.persist_failures(), 0);
        (issue.id.clone(), deadline)
    };

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let reopened = IssueStore::open(storage, StoreConfig::new());
    let issue = reopened.get_issue(&id).unwrap();

    assert_eq!(reopened.len(), 1);
    assert_eq!(issue.status, IssueStatus::Resolved);
    assert_eq!(issue.deadline, Some(deadline));
    assert!(issue.resolved_at.is_some());
    assert_eq!(issue.comments.len(), 1);
    assert_eq!(issue.activity_log.len(), 4);
    assert_eq!(issue.department_assigned.as_deref(), Some("Student Affairs"));
}

#[test]
fn test_persisted_layout_uses_camel_case_and_iso_timestamps() {
    let storage = Arc::new(MemoryStorage::new());
    let store = IssueStore::open(storage.clone(), StoreConfig::new());
    store.add_issue(hostel_draft(), None);

    let text = storage.get("ciras-issues").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let first = &value[0];
    assert_eq!(first["status"], "submitted");
    assert_eq!(first["category"], "Hostels & Accommodation");
    assert_eq!(first["studentId"], "s1");
    assert!(first["createdAt"].as_str().unwrap().contains('T'));
    assert!(first["activityLog"].is_array());
    assert!(first.get("departmentAssigned").is_none());
}

#[test]
fn test_unnamed_reporter_persists_without_student_id() {
    let storage = Arc::new(MemoryStorage::new());
    let store = IssueStore::open(storage.clone(), StoreConfig::new());
    let reporter = User::student(None);
    let draft = IssueDraft::new(Category::WaterSanitation, "X", "Y").reported_by(None);
    let issue = store.add_issue(draft, Some(&reporter));

    assert!(issue.student_id.is_none());
    assert_eq!(issue.activity_log.first().unwrap().actor, "Anonymous Student");
    let value: serde_json::Value = serde_json::from_str(&storage.get("ciras-issues").unwrap().unwrap()).unwrap();
    assert!(value[0].get("studentId").is_none());
}

#[test]
fn test_malformed_record_starts_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set("ciras-issues", "{ not json").unwrap();

    let store = IssueStore::open(storage.clone(), StoreConfig::new());
    assert!(store.is_empty());

    // the next mutation overwrites the bad record
    store.add_issue(hostel_draft(), None);
    let reopened = IssueStore::open(storage, StoreConfig::new());
    assert_eq!(reopened.len(), 1);
}

#[test]
fn test_stored_overdue_status_is_rejected() {
    let store = memory_store();
    store.add_issue(hostel_draft(), None);
    let text = encode_issues(&store.issues()).unwrap().replace("\"submitted\"", "\"overdue\"");
    assert!(decode_issues(&text).is_err());
}

#[test]
fn test_write_failures_are_counted_not_returned() {
    let store = IssueStore::open(Arc::new(BrokenStorage), StoreConfig::new());
    let issue = store.add_issue(hostel_draft(), None);
    let updated = store
        .update_issue_status(&issue.id, IssueStatus::InProgress, &admin())
        .unwrap();

    assert_eq!(updated.status, IssueStatus::InProgress);
    assert_eq!(store.len(), 1);
    assert_eq!(store.persist_failures(), 2);
}

#[test]
fn test_custom_issue_key() {
    let storage = Arc::new(MemoryStorage::new());
    let mut config = StoreConfig::new();
    config.keys.issues = "campus-issues".to_string();
    let store = IssueStore::open(storage.clone(), config);
    store.add_issue(hostel_draft(), None);

    assert!(storage.get("campus-issues").unwrap().is_some());
    assert!(storage.get("ciras-issues").unwrap().is_none());
}

#[tokio::test]
async fn test_write_behind_reaches_disk_after_flush() {
    let dir = tempfile::tempdir().unwrap();
    let files = Arc::new(FileStorage::open(dir.path()).unwrap());
    let (queued, writer) = WriteBehindStorage::spawn(files.clone());
    let queued = Arc::new(queued);

    let store = IssueStore::open(queued.clone(), StoreConfig::new());
    let issue = store.add_issue(hostel_draft(), Some(&User::student(Some("Ada"))));
    store.assign_issue_to_department(&issue.id, "Student Affairs", &admin()).unwrap();

    queued.flush().await.unwrap();
    assert_eq!(queued.pending_writes(), 0);
    let on_disk = decode_issues(&files.get("ciras-issues").unwrap().unwrap()).unwrap();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].activity_log.len(), 2);

    drop(store);
    drop(queued);
    writer.await.unwrap();
}
