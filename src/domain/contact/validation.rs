//! Contact form validation

use validator::Validate;

use super::ContactForm;
use crate::domain::DomainError;

/// Field order used when reporting the first failing field
const FIELD_ORDER: [&str; 5] = ["first_name", "last_name", "email", "phone", "message"];

/// Trim and validate a contact form.
///
/// Returns the trimmed form, or a validation error naming the first failing
/// field in form order.
pub fn validate_contact_form(form: &ContactForm) -> Result<ContactForm, DomainError> {
    let trimmed = form.trimmed();

    if let Err(errors) = trimmed.validate() {
        let field_errors = errors.field_errors();

        let message = FIELD_ORDER
            .iter()
            .find_map(|field| {
                field_errors.get(*field).and_then(|errs| {
                    errs.first().map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for {}", field))
                    })
                })
            })
            .unwrap_or_else(|| "Invalid contact form submission".to_string());

        return Err(DomainError::validation(message));
    }

    Ok(trimmed)
}
