use ferrous_finalize_domain::DomainError;
use hickory_proto::op::ResponseCode;
use std::io;
use thiserror::Error;

/// Failures that escape the finalize stage to the transport layer.
#[derive(Error, Debug)]
pub enum FinalizeError {
    #[error("no answer received")]
    NoResponse,

    #[error("next handler failed: {0}")]
    Next(#[from] DomainError),

    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),
}

impl FinalizeError {
    /// Status to report to the client, if one can still be sent.
    pub fn response_code(&self) -> Option<ResponseCode> {
        match self {
            FinalizeError::NoResponse | FinalizeError::Next(_) => Some(ResponseCode::ServFail),
            FinalizeError::Write(_) => None,
        }
    }
}
