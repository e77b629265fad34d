//! Phonebook application context.
//!
//! # Responsibility
//! - Own the contact store, the filter state and the form state together.
//! - Produce render-ready rows for whichever front-end drives it.
//!
//! # Invariants
//! - The store is only mutated through this context or the form it owns.
//! - Visible rows are derived on every call, never cached.

use crate::model::contact::{Contact, ContactId};
use crate::repo::kv_repo::KeyValueStorage;
use crate::service::contact_store::{ContactStore, StoreResult};
use crate::service::filter::ContactFilter;
use crate::service::form::{ContactForm, FormError};
use serde::Serialize;

/// One rendered line of the contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub number: String,
    /// `"<name>: <number>"`.
    pub label: String,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name.clone(),
            number: contact.number.clone(),
            label: format!("{}: {}", contact.name, contact.number),
        }
    }
}

/// Application context owning every piece of phonebook state.
pub struct Phonebook<S: KeyValueStorage> {
    store: ContactStore<S>,
    filter: ContactFilter,
    form: ContactForm,
}

impl<S: KeyValueStorage> Phonebook<S> {
    /// Opens the phonebook over `storage`, loading the persisted snapshot.
    pub fn open(storage: S) -> StoreResult<Self> {
        Ok(Self::with_store(ContactStore::open(storage)?))
    }

    pub fn with_store(store: ContactStore<S>) -> Self {
        Self {
            store,
            filter: ContactFilter::new(),
            form: ContactForm::new(),
        }
    }

    pub fn store(&self) -> &ContactStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContactStore<S> {
        &mut self.store
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn filter(&self) -> &ContactFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
    }

    /// Fills the form and submits it in one step.
    pub fn add_contact(
        &mut self,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> Result<Contact, FormError> {
        self.form.set_name(name);
        self.form.set_number(number);
        self.submit_form()
    }

    /// Submits the current form fields to the store.
    pub fn submit_form(&mut self) -> Result<Contact, FormError> {
        self.form.submit(&mut self.store)
    }

    pub fn delete_contact(&mut self, id: &ContactId) -> StoreResult<Option<Contact>> {
        self.store.delete(id)
    }

    /// Contacts passing the current filter, in list order.
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        self.filter.apply(self.store.list())
    }

    pub fn visible_rows(&self) -> Vec<ContactRow> {
        self.visible_contacts()
            .into_iter()
            .map(ContactRow::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactRow, Phonebook};
    use crate::model::contact::{Contact, ContactId};
    use crate::repo::kv_repo::MemoryKeyValueStorage;

    #[test]
    fn row_label_joins_name_and_number() {
        let contact = Contact::with_id(ContactId::from("x1"), "Eden Clements", "645-17-79");
        let row = ContactRow::from(&contact);
        assert_eq!(row.id, "x1");
        assert_eq!(row.label, "Eden Clements: 645-17-79");
    }

    #[test]
    fn visible_rows_follow_filter() {
        let mut phonebook = Phonebook::open(MemoryKeyValueStorage::new()).unwrap();
        phonebook.add_contact("Rosie Simpson", "459-12-56").unwrap();
        phonebook.add_contact("Eden Clements", "645-17-79").unwrap();

        phonebook.set_filter("rOsIe");
        let rows = phonebook.visible_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Rosie Simpson: 459-12-56");

        phonebook.set_filter("");
        assert_eq!(phonebook.visible_rows().len(), 2);
    }
}
