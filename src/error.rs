//! Error types for mail-triage.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Form validation errors. Shown inline next to the text field; no request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("É necessário fornecer o conteúdo do e-mail ou um arquivo.")]
    MissingInput,

    #[error("Tipo de arquivo não suportado. Apenas .txt ou .pdf.")]
    UnsupportedFileType { file_name: String },
}

/// Errors raised while talking to the classification service.
///
/// Every variant is caught at the submission boundary and turned into a
/// `Failed` state; none of them escape the controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Service answered with a non-2xx status. `message` is the `detail`
    /// field of the body, or the generic fallback.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// Network failure or a response body that could not be parsed.
    #[error("{0}")]
    Transport(String),

    /// The selected file could not be read before sending.
    #[error("Falha ao ler o arquivo {file_name}: {reason}")]
    FileRead { file_name: String, reason: String },
}

impl RequestError {
    /// HTTP status, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_displays_detail_verbatim() {
        let err = RequestError::HttpStatus {
            status: 422,
            message: "Arquivo inválido".into(),
        };
        assert_eq!(err.to_string(), "Arquivo inválido");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn transport_has_no_status() {
        let err = RequestError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn missing_input_message() {
        assert_eq!(
            ValidationError::MissingInput.to_string(),
            "É necessário fornecer o conteúdo do e-mail ou um arquivo."
        );
    }
}
