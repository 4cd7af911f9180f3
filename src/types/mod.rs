use thiserror::Error;

mod domain_types;

pub use domain_types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid API token: {reason}")]
    InvalidApiToken { reason: String },

    #[error("Unknown instance type '{0}' (expected 'cloud' or 'server')")]
    UnknownInstanceType(String),

    #[error("Unknown auth type '{0}' (expected 'basic' or 'bearer')")]
    UnknownAuthType(String),
}
