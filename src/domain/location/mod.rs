//! Location domain - city location pages and their source

mod entity;
mod source;

pub use entity::{Location, LocationEnvironment};
pub use source::LocationSource;

#[cfg(test)]
pub use source::mock;
