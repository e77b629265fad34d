use phonebook_core::db::open_db;
use phonebook_core::{FormError, MemoryKeyValueStorage, Phonebook, SqliteKeyValueStorage};

#[test]
fn form_to_store_to_filter_flow() {
    let mut phonebook = Phonebook::open(MemoryKeyValueStorage::new()).unwrap();
    phonebook.form_mut().set_name("Hermione Kline");
    phonebook.form_mut().set_number("443-89-12");
    phonebook.submit_form().unwrap();
    phonebook.add_contact("Annie Copeland", "227-91-26").unwrap();

    phonebook.set_filter("an");
    let labels: Vec<String> = phonebook
        .visible_rows()
        .into_iter()
        .map(|row| row.label)
        .collect();
    assert_eq!(labels, ["Annie Copeland: 227-91-26"]);

    phonebook.set_filter("");
    assert_eq!(phonebook.visible_rows().len(), 2);
}

#[test]
fn filter_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let mut phonebook = Phonebook::open(SqliteKeyValueStorage::try_new(&conn).unwrap()).unwrap();
        phonebook.add_contact("Eden Clements", "645-17-79").unwrap();
        phonebook.set_filter("nobody");
        assert!(phonebook.visible_rows().is_empty());
    }

    let conn = open_db(&path).unwrap();
    let phonebook = Phonebook::open(SqliteKeyValueStorage::try_new(&conn).unwrap()).unwrap();
    assert_eq!(phonebook.filter().query(), "");
    assert_eq!(phonebook.visible_rows().len(), 1);
}

#[test]
fn delete_through_context_updates_rows() {
    let mut phonebook = Phonebook::open(MemoryKeyValueStorage::new()).unwrap();
    let bob = phonebook.add_contact("Bob", "555-1234").unwrap();

    phonebook.delete_contact(&bob.id).unwrap();
    assert!(phonebook.visible_rows().is_empty());

    let err = phonebook.add_contact("Bob", "12").unwrap_err();
    assert!(matches!(err, FormError::InvalidNumber(_)));
    assert_eq!(phonebook.form().name(), "Bob");
}
