//! Sheet domain - header-keyed records and the store that reads and appends them

mod record;
mod repository;

pub use record::{normalize_header, rows_to_records, Record};
pub use repository::{fetch_sheet_filtered, filter_by_state, AppendAck, SheetStore};

#[cfg(test)]
pub use repository::MockSheetStore;

/// Sheet names used by the site
pub mod names {
    pub const CITIES: &str = "Cities";
    pub const LOCATIONS: &str = "Locations";
    pub const KEYPOINTS: &str = "Keypoints";
    pub const PRACTICE_AREAS: &str = "PracticeAreas";
    pub const STATES: &str = "States";
    pub const SUBMISSIONS: &str = "Submissions";
    /// Default tab name of a fresh spreadsheet
    pub const DEFAULT_TAB: &str = "Sheet1";
}
