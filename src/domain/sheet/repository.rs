//! Sheet store trait definition

use async_trait::async_trait;
use serde::Serialize;

use super::Record;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Acknowledgement of an append
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendAck {
    /// Range the rows were written to, as reported by the backend
    pub updated_range: Option<String>,
    /// Number of rows appended
    pub updated_rows: usize,
}

/// Tabular backing store addressed by sheet name
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SheetStore: Send + Sync + std::fmt::Debug {
    /// Reads every data row of a sheet as header-keyed records
    async fn fetch_sheet(&self, sheet: &str) -> Result<Vec<Record>, DomainError>;

    /// Appends rows, each a positional list of cell values
    async fn append_rows(
        &self,
        sheet: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<AppendAck, DomainError>;
}

/// Keeps records whose `state` or `state name` column matches `state_name`
/// case-insensitively. `None` or a blank name keeps everything.
pub fn filter_by_state(records: Vec<Record>, state_name: Option<&str>) -> Vec<Record> {
    let Some(wanted) = state_name.map(str::trim).filter(|s| !s.is_empty()) else {
        return records;
    };

    records
        .into_iter()
        .filter(|record| {
            [
                record.field(&["state name", "statename"]),
                record.field(&["state", "state code"]),
            ]
            .iter()
            .any(|value| value.eq_ignore_ascii_case(wanted))
        })
        .collect()
}

/// Reads a sheet and applies the optional state-name filter
pub async fn fetch_sheet_filtered(
    store: &dyn SheetStore,
    sheet: &str,
    state_name: Option<&str>,
) -> Result<Vec<Record>, DomainError> {
    let records = store.fetch_sheet(sheet).await?;
    Ok(filter_by_state(records, state_name))
}
