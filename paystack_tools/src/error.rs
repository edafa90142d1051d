use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaystackApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach Paystack: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Paystack returned an unsuccessful envelope: {0}")]
    EnvelopeError(String),
    #[error("Paystack response carried no data section")]
    EmptyResponse,
}
