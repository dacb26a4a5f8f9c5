use std::fs;
use std::path::PathBuf;

use formdesk_model::{Field, FieldType, Form};
use formdesk_store::{FormRepository, UserOptionsStore};

fn temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("formdesk_{tag}_{stamp}"));
    dir
}

fn cleanup_dir(dir: &PathBuf) {
    let _ = fs::remove_dir_all(dir);
}

fn sample_form(id: u64) -> Form {
    let mut form = Form::new(id, "Contact");
    form.fields.push(Field::new(id + 1, FieldType::Textbox, "Name"));
    form.fields.push(Field::new(id + 2, FieldType::Email, "Email"));
    form
}

#[test]
fn repository_save_and_load() {
    let dir = temp_dir("forms");
    let repo = FormRepository::new(&dir).expect("create repo");

    let form = sample_form(3);
    let path = repo.save(&form).expect("save form");
    assert!(path.exists());
    assert!(path.to_string_lossy().contains("form_3.json"));

    let loaded = repo.load(3).expect("load form").expect("form should exist");
    assert_eq!(loaded, form);

    cleanup_dir(&dir);
}

#[test]
fn repository_load_nonexistent() {
    let dir = temp_dir("forms");
    let repo = FormRepository::new(&dir).expect("create repo");
    assert!(repo.load(99).expect("load attempt").is_none());
    assert!(!repo.exists(99));
    cleanup_dir(&dir);
}

#[test]
fn repository_lists_in_id_order() {
    let dir = temp_dir("forms");
    let repo = FormRepository::new(&dir).expect("create repo");
    repo.save(&sample_form(20)).expect("save");
    repo.save(&sample_form(4)).expect("save");

    let ids: Vec<u64> = repo.list().expect("list").iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![4, 20]);
    cleanup_dir(&dir);
}

#[test]
fn repository_allocates_above_stored_ids() {
    let dir = temp_dir("forms");
    let repo = FormRepository::new(&dir).expect("create repo");
    assert_eq!(repo.allocate_form_id().expect("allocate"), 1);
    repo.save(&sample_form(7)).expect("save");
    assert_eq!(repo.allocate_form_id().expect("allocate"), 8);
    cleanup_dir(&dir);
}

#[test]
fn repository_delete() {
    let dir = temp_dir("forms");
    let repo = FormRepository::new(&dir).expect("create repo");
    repo.save(&sample_form(5)).expect("save");
    assert!(repo.delete(5).expect("delete"));
    assert!(!repo.delete(5).expect("second delete"));
    cleanup_dir(&dir);
}

#[test]
fn user_options_round_trip() {
    let dir = temp_dir("options");
    let store = UserOptionsStore::new(&dir).expect("create store");

    let hidden = vec!["form_1_field_9".to_string()];
    store
        .set(1, "hidden_columns_form_1", &hidden)
        .expect("set option");
    let loaded: Option<Vec<String>> = store
        .get(1, "hidden_columns_form_1")
        .expect("get option");
    assert_eq!(loaded, Some(hidden));

    // Options are scoped per user.
    let other: Option<Vec<String>> = store
        .get(2, "hidden_columns_form_1")
        .expect("get other user");
    assert_eq!(other, None);

    store.remove(1, "hidden_columns_form_1").expect("remove");
    let gone: Option<Vec<String>> = store
        .get(1, "hidden_columns_form_1")
        .expect("get removed");
    assert_eq!(gone, None);

    cleanup_dir(&dir);
}
