//! Parses terminal input lines into form commands.

use std::path::PathBuf;

/// One user action on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// A line of email text, appended to the text field.
    Text(String),
    /// Choose a file. `None` means an empty selection.
    ChooseFile(Option<PathBuf>),
    ClearFile,
    ClearText,
    Submit,
    Status,
    /// Close the error dialog.
    Dismiss,
    Help,
    Quit,
    /// Slash command we don't know.
    Unknown(String),
}

impl FormCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "/submit" | "/send" => Self::Submit,
            "/clear-file" => Self::ClearFile,
            "/clear-text" | "/clear" => Self::ClearText,
            "/status" => Self::Status,
            "/dismiss" | "/ok" => Self::Dismiss,
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            "/file" => Self::ChooseFile(None),
            _ => parse_complex(line, trimmed, &lower),
        }
    }
}

fn parse_complex(line: &str, trimmed: &str, lower: &str) -> FormCommand {
    if lower.starts_with("/file ") {
        // Path keeps its case.
        let path = trimmed["/file ".len()..].trim();
        return FormCommand::ChooseFile(Some(PathBuf::from(path)));
    }
    if trimmed.starts_with('/') && !trimmed.contains(char::is_whitespace) {
        return FormCommand::Unknown(trimmed.to_string());
    }
    FormCommand::Text(line.to_string())
}

pub const HELP: &str = "\
Type or paste the email text, one line at a time.
  /file <path>   choose a .txt or .pdf file instead
  /clear-file    remove the selected file
  /clear-text    erase the typed text
  /submit        send for classification
  /status        show the form and the last result
  /dismiss       close the error message
  /quit          exit";
