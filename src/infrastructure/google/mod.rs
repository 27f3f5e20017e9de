//! Google service-account auth and the Sheets values API

mod cached_token_provider;
mod sheets;
mod token_provider;

pub use cached_token_provider::{CachedTokenProvider, DEFAULT_TOKEN_CACHE_TTL};
pub use sheets::{sheet_range, GoogleSheetsClient, SHEETS_API_BASE_URL};
pub use token_provider::{ServiceAccountTokenProvider, GOOGLE_TOKEN_URL, SHEETS_SCOPE};
