//! Credentials domain - access tokens for the spreadsheet API

mod token;

pub use token::{AccessToken, AccessTokenProvider, ServiceAccountCredentials};

#[cfg(test)]
pub use token::mock;
