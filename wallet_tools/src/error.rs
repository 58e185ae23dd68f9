use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("{0} does not exist on the remote pass store")]
    NotFound(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not load credentials: {0}")]
    Credentials(String),
    #[error("Could not sign save-to-wallet claims: {0}")]
    Signing(String),
}
