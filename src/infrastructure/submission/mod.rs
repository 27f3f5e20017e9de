//! Contact form submissions

mod service;

pub use service::SubmissionService;
