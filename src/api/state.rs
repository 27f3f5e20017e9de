//! Application state for shared services

use std::sync::Arc;

use crate::domain::SheetStore;
use crate::infrastructure::content::ContentService;
use crate::infrastructure::images::ImageSearchService;
use crate::infrastructure::location::LocationCache;
use crate::infrastructure::submission::SubmissionService;

/// Services shared by every handler. Caches and the rate-limit table live
/// inside these services, so one `AppState` owns all mutable process state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub sheets: Arc<dyn SheetStore>,
    pub content: Arc<ContentService>,
    pub locations: Arc<LocationCache>,
    pub images: Arc<ImageSearchService>,
    pub submissions: Arc<SubmissionService>,
    /// Whether spreadsheet id and service-account credentials are set
    pub sheets_configured: bool,
}

impl AppState {
    pub fn new(
        sheets: Arc<dyn SheetStore>,
        locations: Arc<LocationCache>,
        images: Arc<ImageSearchService>,
        submissions: Arc<SubmissionService>,
    ) -> Self {
        Self {
            content: Arc::new(ContentService::new(sheets.clone())),
            sheets,
            locations,
            images,
            submissions,
            sheets_configured: true,
        }
    }

    pub fn with_sheets_configured(mut self, configured: bool) -> Self {
        self.sheets_configured = configured;
        self
    }
}
