//! Content accessors built on the sheet store

mod service;

pub use service::{CityPage, ContentService};
