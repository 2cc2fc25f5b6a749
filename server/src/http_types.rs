use actix_web::http::{header::ContentType, StatusCode};
use actix_web::HttpResponse;
use derive_more::Display;

use crate::ingest::IngestError;

pub type HttpResult = Result<HttpResponse, AppHttpError>;

#[derive(Debug, Display)]
pub enum AppHttpError {
    #[display(fmt = "Internal error.")]
    Internal,

    #[display(fmt = "Bad request.")]
    BadClientData,

    #[display(fmt = "Not found.")]
    NotFound,

    #[display(fmt = "Unsupported protocol version.")]
    UnsupportedProtocol,

    #[display(fmt = "Payload too large.")]
    PayloadTooLarge,

    #[display(fmt = "Match is already finalized.")]
    AlreadyFinalized,
}

impl std::error::Error for AppHttpError {}

impl actix_web::error::ResponseError for AppHttpError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppHttpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppHttpError::BadClientData => StatusCode::BAD_REQUEST,
            AppHttpError::NotFound => StatusCode::NOT_FOUND,
            AppHttpError::UnsupportedProtocol => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppHttpError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppHttpError::AlreadyFinalized => StatusCode::CONFLICT,
        }
    }
}

/// Logs an ingestion failure at a level matching whose fault it is and
/// converts it for the response.
pub fn ingest_error(op: &str, e: IngestError) -> AppHttpError {
    match &e {
        IngestError::Storage(_) | IngestError::MissingPlayer(_) => log::error!("{op}: {e}"),
        _ => log::info!("{op} rejected: {e}"),
    }
    e.into()
}

impl From<IngestError> for AppHttpError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::UnsupportedProtocol(_) => AppHttpError::UnsupportedProtocol,
            IngestError::BadTimestamp(_) | IngestError::BadOutcome(_) => {
                AppHttpError::BadClientData
            }
            IngestError::UnknownMatch(_) => AppHttpError::NotFound,
            IngestError::AlreadyFinalized(_) => AppHttpError::AlreadyFinalized,
            // An upstream bug, not bad input; never leak detail to the client.
            IngestError::MissingPlayer(_) => AppHttpError::Internal,
            IngestError::Storage(_) => AppHttpError::Internal,
        }
    }
}
