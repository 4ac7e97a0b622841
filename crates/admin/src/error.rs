use thiserror::Error;

use facilityhub_core::DomainError;

use crate::validation::ValidationErrors;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// Payload rejected by the rule set; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The route-supplied record does not exist in this tenant.
    #[error("not found")]
    NotFound,

    /// Payload passed validation but could not be mapped to the input type.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The store refused the write, e.g. a concurrent request took the name first.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
