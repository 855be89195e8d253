use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum CommonError {
    #[error("BadDataError: [{message}]")]
    BadDataError { message: String },
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::BadDataError { message: format!("{}", err) }
    }
}
