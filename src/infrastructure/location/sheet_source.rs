use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::sheet::names;
use crate::domain::{first_success, DomainError, Location, LocationSource, SheetStore};

/// Reads locations from the spreadsheet, trying each sheet in order.
///
/// A sheet without a single usable row counts as a failed candidate.
#[derive(Debug)]
pub struct SheetLocationSource {
    store: Arc<dyn SheetStore>,
    sheets: Vec<String>,
}

impl SheetLocationSource {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self::with_sheets(store, [names::LOCATIONS, names::CITIES])
    }

    pub fn with_sheets<S: Into<String>>(
        store: Arc<dyn SheetStore>,
        sheets: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            store,
            sheets: sheets.into_iter().map(Into::into).collect(),
        }
    }

    async fn load_sheet(&self, sheet: &str) -> Result<Vec<Location>, DomainError> {
        let locations: Vec<Location> = self
            .store
            .fetch_sheet(sheet)
            .await?
            .iter()
            .map(Location::from_record)
            .filter(Location::is_usable)
            .collect();

        if locations.is_empty() {
            return Err(DomainError::not_found(format!(
                "Sheet '{}' has no usable locations",
                sheet
            )));
        }

        Ok(locations)
    }
}

#[async_trait]
impl LocationSource for SheetLocationSource {
    async fn fetch_locations(&self) -> Result<Vec<Location>, DomainError> {
        first_success(self.sheets.iter().cloned(), |sheet: String| async move {
            self.load_sheet(&sheet).await
        })
        .await
        .map(|(_, locations)| locations)
        .map_err(|exhausted| exhausted.into_last_error())
    }

    fn source_name(&self) -> &'static str {
        "sheets"
    }
}
