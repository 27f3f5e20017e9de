//! Contact form submission: validate, verify CAPTCHA, append to the sheet

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::sheet::names;
use crate::domain::{
    validate_contact_form, AppendAck, Clock, ContactForm, ContactSubmission, DomainError,
    SheetStore,
};
use crate::infrastructure::captcha::CaptchaVerifier;

#[derive(Debug)]
pub struct SubmissionService {
    store: Arc<dyn SheetStore>,
    captcha: Option<Arc<dyn CaptchaVerifier>>,
    clock: Arc<dyn Clock>,
}

impl SubmissionService {
    /// Without a verifier, CAPTCHA checks are skipped
    pub fn new(
        store: Arc<dyn SheetStore>,
        captcha: Option<Arc<dyn CaptchaVerifier>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            captcha,
            clock,
        }
    }

    pub fn requires_captcha(&self) -> bool {
        self.captcha.is_some()
    }

    /// Stores one submission.
    ///
    /// `Validation` for bad input or a rejected CAPTCHA, `Internal` when the
    /// CAPTCHA could not be checked, `SheetWrite` when the append fails.
    pub async fn submit(
        &self,
        form: &ContactForm,
        remote_ip: Option<&str>,
    ) -> Result<AppendAck, DomainError> {
        let form = validate_contact_form(form)?;

        if let Some(verifier) = &self.captcha {
            let token = form
                .recaptcha_token
                .as_deref()
                .ok_or_else(|| DomainError::validation("CAPTCHA token is required"))?;

            let verified = verifier.verify(token, remote_ip).await.map_err(|e| {
                error!(error = %e, "CAPTCHA verification unavailable");
                DomainError::internal("CAPTCHA verification failed")
            })?;

            if !verified {
                warn!(remote_ip = ?remote_ip, "CAPTCHA rejected contact submission");
                return Err(DomainError::validation("CAPTCHA verification failed"));
            }
        }

        let submission = ContactSubmission::from_form(&form, self.clock.now());
        let ack = self
            .store
            .append_rows(names::SUBMISSIONS, vec![submission.to_row()])
            .await
            .inspect_err(|e| error!(error = %e, "Failed to store contact submission"))?;

        info!(
            service = %submission.service,
            updated_range = ?ack.updated_range,
            "Stored contact submission"
        );

        Ok(ack)
    }
}
