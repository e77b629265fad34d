//! Contact form input.
//!
//! # Responsibility
//! - Hold the two uncommitted fields of a new contact.
//! - Gate submission on name/number patterns before the store is called.
//!
//! # Invariants
//! - Pattern failures never reach the store.
//! - Fields are cleared only after a successful add.

use crate::model::contact::Contact;
use crate::repo::kv_repo::KeyValueStorage;
use crate::service::contact_store::{ContactStore, StoreError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Letters, with apostrophe/dash/space allowed only between letter runs.
static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Zа-яА-Я]+(([' -][a-zA-Zа-яА-Я ])?[a-zA-Zа-яА-Я]*)*$")
        .expect("valid name regex")
});
// ASCII digits only; `\d` would also accept other scripts' digits.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{1,4}?[-.\s]?\(?[0-9]{1,3}?\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,9}$")
        .expect("valid number regex")
});

/// Hint shown next to the name input.
pub const NAME_HINT: &str = "Name may contain only letters, apostrophe, dash and spaces. For example Adrian, Jacob Mercer, Charles de Batz de Castelmore d'Artagnan";
/// Hint shown next to the number input.
pub const NUMBER_HINT: &str = "Phone number must be digits and can contain spaces, dashes, parentheses and can start with +";

/// Returns whether `value` is an acceptable contact name.
pub fn is_valid_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

/// Returns whether `value` looks like a phone number.
pub fn is_valid_number(value: &str) -> bool {
    NUMBER_RE.is_match(value)
}

/// Submission failure for the contact form.
#[derive(Debug)]
pub enum FormError {
    InvalidName(String),
    InvalidNumber(String),
    Store(StoreError),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "invalid name `{value}`: {NAME_HINT}"),
            Self::InvalidNumber(value) => write!(f, "invalid number `{value}`: {NUMBER_HINT}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for FormError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Uncommitted name/number pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    name: String,
    number: String,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
    }

    pub fn set_number(&mut self, value: impl Into<String>) {
        self.number = value.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Checks both fields without submitting.
    pub fn validate(&self) -> Result<(), FormError> {
        if !is_valid_name(&self.name) {
            return Err(FormError::InvalidName(self.name.clone()));
        }
        if !is_valid_number(&self.number) {
            return Err(FormError::InvalidNumber(self.number.clone()));
        }
        Ok(())
    }

    /// Validates and hands the candidate to `store`.
    ///
    /// # Contract
    /// - Success clears both fields and returns the created contact.
    /// - Any failure leaves both fields populated for correction.
    pub fn submit<S: KeyValueStorage>(
        &mut self,
        store: &mut ContactStore<S>,
    ) -> Result<Contact, FormError> {
        self.validate()?;
        let contact = store.add(&self.name, &self.number)?;
        self.clear();
        Ok(contact)
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.number.clear();
    }
}
