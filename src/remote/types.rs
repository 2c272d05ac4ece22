//! Error taxonomy for backend calls.
//!
//! `Conflict` is not terminal: a delete-409 carries the authoritative list
//! of attached campaigns and re-enters the modal state machine; a
//! publish-409 carries a business-rule message shown verbatim. Local
//! confirmation-gate failures never construct an error here; the request
//! simply is not issued.

use crate::model::{CampaignRef, ShapeError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request rejected, aborted, or the transport failed.
    #[error("network: {0:#}")]
    Network(#[source] anyhow::Error),

    #[error("not found")]
    NotFound,

    /// 409 with a structured body.
    #[error("conflict: {message}")]
    Conflict {
        message: String,
        campaigns: Vec<CampaignRef>,
    },

    /// 5xx or any status the client does not classify.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx whose body matched none of the known shapes.
    #[error("unrecognized response: {0}")]
    Shape(#[from] ShapeError),
}

impl ApiError {
    pub(super) fn network(err: reqwest::Error, label: &'static str) -> Self {
        ApiError::Network(anyhow::Error::new(err).context(label))
    }
}
