use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported file type for {name} ({content_type}); only CSV files are accepted")]
    UnsupportedFileType { name: String, content_type: String },

    #[error("failed to parse CSV: {source}")]
    Parse {
        #[source]
        source: csv::Error,
    },
}

impl From<csv::Error> for PipelineError {
    fn from(source: csv::Error) -> Self {
        Self::Parse { source }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let status = match err {
            PipelineError::UnsupportedFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            PipelineError::Parse { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
