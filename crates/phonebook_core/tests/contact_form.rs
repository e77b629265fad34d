use phonebook_core::{
    ContactForm, ContactStore, FormError, MemoryKeyValueStorage, StoreError,
};

fn empty_store() -> ContactStore<MemoryKeyValueStorage> {
    ContactStore::open(MemoryKeyValueStorage::new()).unwrap()
}

#[test]
fn valid_submission_adds_contact_and_clears_fields() {
    let mut store = empty_store();
    let mut form = ContactForm::new();
    form.set_name("Jacob Mercer");
    form.set_number("+1 555 123 4567");

    let contact = form.submit(&mut store).unwrap();
    assert_eq!(contact.name, "Jacob Mercer");
    assert_eq!(store.list(), &[contact][..]);
    assert_eq!(form.name(), "");
    assert_eq!(form.number(), "");
}

#[test]
fn invalid_name_never_reaches_store() {
    let mut store = empty_store();
    let mut form = ContactForm::new();
    form.set_name("R2-D2");
    form.set_number("459-12-56");

    let err = form.submit(&mut store).unwrap_err();
    assert!(matches!(err, FormError::InvalidName(ref value) if value == "R2-D2"));
    assert!(store.is_empty());
    assert_eq!(form.name(), "R2-D2");
}

#[test]
fn invalid_number_never_reaches_store() {
    let mut store = empty_store();
    let mut form = ContactForm::new();
    form.set_name("Adrian");
    form.set_number("call me");

    let err = form.submit(&mut store).unwrap_err();
    assert!(matches!(err, FormError::InvalidNumber(_)));
    assert!(store.is_empty());
}

#[test]
fn duplicate_keeps_fields_for_correction() {
    let mut store = empty_store();
    store.add("Rosie Simpson", "459-12-56").unwrap();

    let mut form = ContactForm::new();
    form.set_name("ROSIE SIMPSON");
    form.set_number("443-89-12");

    let err = form.submit(&mut store).unwrap_err();
    assert!(matches!(
        err,
        FormError::Store(StoreError::DuplicateName(_))
    ));
    assert_eq!(err.to_string(), "\"ROSIE SIMPSON\" is already in contacts.");
    assert_eq!(form.name(), "ROSIE SIMPSON");
    assert_eq!(form.number(), "443-89-12");
    assert_eq!(store.len(), 1);
}
