//! API middleware components

pub mod client_addr;
pub mod logging;

pub use client_addr::ClientAddr;
pub use logging::logging_middleware;
