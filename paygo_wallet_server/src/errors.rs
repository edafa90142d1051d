use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use paygo_wallet_engine::{AccountApiError, FundingFlowError, TransferError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("No authenticated user on the request")]
    Unauthenticated,
    #[error(transparent)]
    FundingError(#[from] FundingFlowError),
    #[error(transparent)]
    TransferError(#[from] TransferError),
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::FundingError(e) => match e {
                FundingFlowError::AmountBelowMinimum(_) => StatusCode::BAD_REQUEST,
                FundingFlowError::PaymentNotSuccessful(_) => StatusCode::BAD_REQUEST,
                FundingFlowError::UserNotFound(_) => StatusCode::NOT_FOUND,
                FundingFlowError::GatewayError(_) => StatusCode::BAD_GATEWAY,
                FundingFlowError::MissingUserMetadata(_) => StatusCode::BAD_GATEWAY,
                FundingFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::TransferError(e) => match e {
                TransferError::InvalidAmount
                | TransferError::InvalidPin
                | TransferError::MissingRecipient
                | TransferError::PinNotSet
                | TransferError::IncorrectPin
                | TransferError::SelfTransfer
                | TransferError::InsufficientBalance => StatusCode::BAD_REQUEST,
                TransferError::SenderNotFound(_)
                | TransferError::SenderWalletMissing
                | TransferError::RecipientNotFound => StatusCode::NOT_FOUND,
                TransferError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_)
            | Self::BackendError(_)
            | Self::IOError(_)
            | Self::ConfigurationError(_)
            | Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "message": self.to_string() }).to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        let cases: Vec<(ServerError, StatusCode)> = vec![
            (ServerError::TransferError(TransferError::InvalidAmount), StatusCode::BAD_REQUEST),
            (ServerError::TransferError(TransferError::InsufficientBalance), StatusCode::BAD_REQUEST),
            (ServerError::TransferError(TransferError::RecipientNotFound), StatusCode::NOT_FOUND),
            (
                ServerError::FundingError(FundingFlowError::GatewayError(
                    paygo_wallet_engine::traits::GatewayClientError::Unreachable("down".into()),
                )),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ServerError::FundingError(FundingFlowError::PaymentNotSuccessful("failed".into())),
                StatusCode::BAD_REQUEST,
            ),
            (ServerError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ServerError::NoRecordFound("wallet".into()), StatusCode::NOT_FOUND),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{err}");
        }
    }
}
