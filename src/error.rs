//! Error type for the few fallible entry points.
//!
//! Parsing and diffing never fail on malformed text; the only reportable
//! condition is the optional input-size guard in [`crate::Options`].

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("strategy text is {size} bytes, above the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
