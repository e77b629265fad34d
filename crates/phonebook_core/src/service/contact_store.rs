//! Contact store: the authoritative contact sequence plus its slot mirror.
//!
//! # Responsibility
//! - Own the ordered contact list and its add/delete/list operations.
//! - Mirror the full list into the `contacts` slot after every mutation.
//! - Notify subscribers after every successful mutation.
//!
//! # Invariants
//! - No two contacts share a case-folded name.
//! - Insertion order is preserved.
//! - A failed slot write rolls the in-memory mutation back, so memory and
//!   slot never diverge.
//! - A missing or malformed snapshot yields an empty store.

use crate::model::contact::{Contact, ContactId};
use crate::repo::kv_repo::{KeyValueStorage, StorageError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized contact list.
pub const CONTACTS_STORAGE_KEY: &str = "contacts";

pub type StoreResult<T> = Result<T, StoreError>;

/// Raised when a contact with the same case-folded name already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNameError {
    /// Name as submitted by the caller.
    pub name: String,
}

impl Display for DuplicateNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" is already in contacts.", self.name)
    }
}

impl Error for DuplicateNameError {}

/// Error returned by store mutations.
#[derive(Debug)]
pub enum StoreError {
    DuplicateName(DuplicateNameError),
    /// The contact list could not be serialized into a slot payload.
    Encode(serde_json::Error),
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "contact snapshot encoding failed: {err}"),
            Self::Storage(err) => write!(f, "contact storage failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateName(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<DuplicateNameError> for StoreError {
    fn from(value: DuplicateNameError) -> Self {
        Self::DuplicateName(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Handle returned by [`ContactStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Contact])>;

/// In-memory contact list mirrored into a key-value slot.
pub struct ContactStore<S: KeyValueStorage> {
    storage: S,
    contacts: Vec<Contact>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> ContactStore<S> {
    /// Opens a store seeded from the `contacts` slot.
    ///
    /// # Errors
    /// - Propagates storage read failures. A malformed snapshot is not an
    ///   error; the store starts empty and a warning is logged.
    pub fn open(storage: S) -> StoreResult<Self> {
        let contacts = match storage.get(CONTACTS_STORAGE_KEY)? {
            Some(raw) => decode_snapshot(&raw),
            None => Vec::new(),
        };
        info!(
            "event=store_open module=store status=ok count={}",
            contacts.len()
        );

        Ok(Self {
            storage,
            contacts,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Adds a contact unless its name is already taken (case-insensitive).
    ///
    /// # Errors
    /// - `DuplicateName` leaves the store and slot untouched.
    /// - `Encode` or `Storage` when the slot write fails; the append is
    ///   rolled back.
    pub fn add(&mut self, name: &str, number: &str) -> StoreResult<Contact> {
        if self.contacts.iter().any(|contact| contact.has_name(name)) {
            info!(
                "event=contact_add module=store status=rejected reason=duplicate_name count={}",
                self.contacts.len()
            );
            return Err(DuplicateNameError {
                name: name.to_string(),
            }
            .into());
        }

        let contact = Contact::new(name, number);
        self.contacts.push(contact.clone());
        if let Err(err) = self.persist() {
            self.contacts.pop();
            warn!("event=contact_add module=store status=error error={err}");
            return Err(err);
        }

        info!(
            "event=contact_add module=store status=ok count={}",
            self.contacts.len()
        );
        self.notify();
        Ok(contact)
    }

    /// Removes the contact with `id`.
    ///
    /// Returns the removed contact, or `None` when no contact matched. An
    /// unknown id does not touch the slot.
    pub fn delete(&mut self, id: &ContactId) -> StoreResult<Option<Contact>> {
        let Some(index) = self.contacts.iter().position(|contact| &contact.id == id) else {
            info!("event=contact_delete module=store status=noop");
            return Ok(None);
        };

        let removed = self.contacts.remove(index);
        if let Err(err) = self.persist() {
            self.contacts.insert(index, removed);
            warn!("event=contact_delete module=store status=error error={err}");
            return Err(err);
        }

        info!(
            "event=contact_delete module=store status=ok count={}",
            self.contacts.len()
        );
        self.notify();
        Ok(Some(removed))
    }

    /// Current contacts in insertion order.
    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| &contact.id == id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Registers a listener called with the full list after each mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Contact]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Returns the underlying slot storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) -> StoreResult<()> {
        let payload = encode_snapshot(&self.contacts)?;
        self.storage.set(CONTACTS_STORAGE_KEY, &payload)?;
        Ok(())
    }

    fn notify(&mut self) {
        let contacts = &self.contacts;
        for (_, listener) in self.listeners.iter_mut() {
            listener(contacts);
        }
    }
}

/// Serializes contacts into the slot payload (a JSON array).
pub fn encode_snapshot(contacts: &[Contact]) -> StoreResult<String> {
    Ok(serde_json::to_string(contacts)?)
}

/// Parses a slot payload, falling back to an empty list when malformed.
pub fn decode_snapshot(raw: &str) -> Vec<Contact> {
    match serde_json::from_str::<Vec<Contact>>(raw) {
        Ok(contacts) => contacts,
        Err(err) => {
            warn!(
                "event=store_open module=store status=fallback reason=malformed_snapshot bytes={} error={}",
                raw.len(),
                err
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot, ContactStore, StoreError};
    use crate::model::contact::{Contact, ContactId};
    use crate::repo::kv_repo::MemoryKeyValueStorage;

    #[test]
    fn snapshot_round_trip_preserves_order_and_fields() {
        let contacts = vec![
            Contact::with_id(ContactId::from("a"), "Rosie Simpson", "459-12-56"),
            Contact::with_id(ContactId::from("b"), "Hermione Kline", "443-89-12"),
        ];
        let payload = encode_snapshot(&contacts).unwrap();
        assert_eq!(decode_snapshot(&payload), contacts);
    }

    #[test]
    fn encode_snapshot_of_empty_list_is_empty_array() {
        assert_eq!(encode_snapshot(&[]).unwrap(), "[]");
    }

    #[test]
    fn encode_error_keeps_serde_source() {
        let serde_err = serde_json::from_str::<Vec<Contact>>("x").unwrap_err();
        let err = StoreError::from(serde_err);
        assert!(matches!(err, StoreError::Encode(_)));
        assert!(err.to_string().starts_with("contact snapshot encoding failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn decode_snapshot_falls_back_to_empty() {
        assert!(decode_snapshot("not json").is_empty());
        assert!(decode_snapshot(r#"{"id":"x"}"#).is_empty());
        assert!(decode_snapshot(r#"[{"id":"x","name":"A"}]"#).is_empty());
    }

    #[test]
    fn duplicate_error_renders_user_notification() {
        let mut store = ContactStore::open(MemoryKeyValueStorage::new()).unwrap();
        store.add("Alice", "123").unwrap();
        let err = store.add("ALICE", "1").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(err.to_string(), "\"ALICE\" is already in contacts.");
    }
}
