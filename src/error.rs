use std::io;

/// Errors talking to the gym backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Body could not be decoded into the expected type.
    #[error("Response parse error: {message}")]
    Parse { message: String, body: Option<String> },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse { message: message.into(), body: Some(body.into()) }
    }

    /// Raw response body of a decode failure, for the log.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Parse { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Short text suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { status: 401, .. } | ApiError::Http { status: 403, .. } => {
                "Sin autorización: revisa el token de acceso".to_string()
            }
            ApiError::Http { status: 404, .. } => "Recurso no encontrado".to_string(),
            ApiError::Http { status, message } if message.is_empty() => format!("Error del servidor ({})", status),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Network(_) => "No se pudo conectar con el servidor".to_string(),
            ApiError::Parse { .. } => "Respuesta inesperada del servidor".to_string(),
            ApiError::InvalidUrl(url) => format!("URL inválida: {}", url),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Logger error: {0}")]
    Logging(#[from] log::SetLoggerError),

    #[error("Could not determine the {0} directory")]
    MissingDir(&'static str),
}
