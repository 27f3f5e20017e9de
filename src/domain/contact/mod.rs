//! Contact domain - form payloads and stored submissions

mod entity;
mod validation;

pub use entity::{ContactForm, ContactSubmission};
pub use validation::validate_contact_form;
