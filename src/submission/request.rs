//! Outbound request: one multipart body with exactly one named part.

use reqwest::multipart::{Form, Part};

use crate::error::RequestError;
use crate::form::NormalizedPayload;

/// Form part carrying pasted text.
pub const TEXT_PART: &str = "email_content";

/// Form part carrying an uploaded file.
pub const FILE_PART: &str = "email_file";

/// The request body, kept inspectable until it is turned into a reqwest form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    Text {
        content: String,
    },
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl OutboundRequest {
    /// Build the request from a payload, reading the file if there is one.
    pub async fn from_payload(payload: NormalizedPayload) -> Result<Self, RequestError> {
        match payload {
            NormalizedPayload::Text(content) => Ok(Self::Text { content }),
            NormalizedPayload::File(file) => {
                let bytes =
                    tokio::fs::read(&file.path)
                        .await
                        .map_err(|e| RequestError::FileRead {
                            file_name: file.name.clone(),
                            reason: e.to_string(),
                        })?;
                Ok(Self::File {
                    content_type: file.content_type().to_string(),
                    file_name: file.name,
                    bytes,
                })
            }
        }
    }

    /// Name of the single form part.
    pub fn part_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => TEXT_PART,
            Self::File { .. } => FILE_PART,
        }
    }

    pub fn into_form(self) -> Result<Form, RequestError> {
        match self {
            Self::Text { content } => Ok(Form::new().text(TEXT_PART, content)),
            Self::File {
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)?;
                Ok(Form::new().part(FILE_PART, part))
            }
        }
    }
}
