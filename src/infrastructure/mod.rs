//! Infrastructure layer - External service implementations

pub mod cache;
pub mod captcha;
pub mod content;
pub mod google;
pub mod http;
pub mod images;
pub mod location;
pub mod logging;
pub mod submission;
