//! Contact Module
//!
//! Validation and storage of contact-form submissions.

mod message;
mod store;

pub use message::ContactMessage;
pub use store::{ContactStore, FileContactStore};

use thiserror::Error;

// == Contact Error ==
#[derive(Debug, Error)]
pub enum ContactError {
    /// Submission failed validation
    #[error("{0}")]
    Invalid(String),

    /// Message could not be written
    #[error("Failed to write contact message: {0}")]
    Io(#[from] std::io::Error),

    /// Message could not be encoded
    #[error("Failed to encode contact message: {0}")]
    Encode(#[from] serde_json::Error),
}
