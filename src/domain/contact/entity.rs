use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact form payload as posted by the site
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    #[serde(default, alias = "captchaToken")]
    pub recaptcha_token: Option<String>,
}

impl ContactForm {
    /// Copy with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        let trim_opt = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            service: trim_opt(&self.service),
            message: self.message.trim().to_string(),
            recaptcha_token: trim_opt(&self.recaptcha_token),
        }
    }
}

/// A validated submission ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

impl ContactSubmission {
    pub fn from_form(form: &ContactForm, submitted_at: DateTime<Utc>) -> Self {
        Self {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            service: form.service.clone().unwrap_or_default(),
            message: form.message.clone(),
            submitted_at,
        }
    }

    /// Positional row layout of the Submissions sheet
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.service.clone(),
            self.message.clone(),
            self.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_form_deserializes_camel_case() {
        let form: ContactForm = serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "555-0100",
            "message": "I was rear-ended",
            "recaptchaToken": "tok"
        }))
        .unwrap();

        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.service, None);
        assert_eq!(form.recaptcha_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_trimmed_drops_blank_optionals() {
        let form = ContactForm {
            first_name: "  Ada ".to_string(),
            service: Some("   ".to_string()),
            ..Default::default()
        };

        let trimmed = form.trimmed();

        assert_eq!(trimmed.first_name, "Ada");
        assert_eq!(trimmed.service, None);
    }

    #[test]
    fn test_submission_row_layout() {
        let form = ContactForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            service: Some("Car Accidents".to_string()),
            message: "Help".to_string(),
            recaptcha_token: None,
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

        let row = ContactSubmission::from_form(&form, at).to_row();

        assert_eq!(
            row,
            vec![
                "Ada",
                "Lovelace",
                "ada@example.com",
                "555-0100",
                "Car Accidents",
                "Help",
                "2024-03-01T12:30:00Z"
            ]
        );
    }
}
