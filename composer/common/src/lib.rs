use beacon_common_api::{CommonError, Event};
use thiserror::Error;

pub mod clock;
pub mod request;

pub use clock::{Clock, FixedClock, SystemClock};
pub use request::{HttpMethod, RequestDescriptor};

/// A composer is in charge of translating Events for a specific destination.
/// It receives one Event at a time from the pipeline and returns the request that delivers it,
/// or `None` when the Event carries nothing the destination is configured to receive.
///
/// Composers never perform I/O; dispatching the returned request is up to the caller.
pub trait StatelessComposer {
    fn compose(&self, event: &Event) -> Result<Option<RequestDescriptor>, ComposerError>;
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ComposerError {
    #[error("ConfigurationError: [{message}]")]
    ConfigurationError { message: String },
    #[error("MissingArgumentError: [{message}]")]
    MissingArgumentError { message: String },
    #[error("JsonError: [{cause}]")]
    JsonError { cause: String },
}

impl From<serde_json::Error> for ComposerError {
    fn from(err: serde_json::Error) -> Self {
        ComposerError::JsonError { cause: format!("{:?}", err) }
    }
}

impl From<CommonError> for ComposerError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::BadDataError { message } => {
                ComposerError::MissingArgumentError { message }
            }
        }
    }
}
