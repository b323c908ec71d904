//! Input reconciler: keeps the text and file channels mutually exclusive
//! and turns the active one into a payload on submit.

use std::path::PathBuf;

use tracing::debug;

use super::input::{InputState, NormalizedPayload, SelectedFile};
use crate::error::ValidationError;

/// Which controls the presentation layer may enable right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionPolicy {
    pub text_enabled: bool,
    pub file_enabled: bool,
    /// The "clear file" button is shown only while a file is selected.
    pub clear_file_visible: bool,
    pub clear_file_enabled: bool,
    pub submit_enabled: bool,
}

/// Emulates a native file input: a change is only reported when the chosen
/// path differs from the control's current value.
#[derive(Debug, Clone, Default)]
pub struct FileControl {
    value: Option<PathBuf>,
    generation: u64,
}

impl FileControl {
    /// Returns `true` if choosing `files` fires a change.
    fn choose(&mut self, files: &[SelectedFile]) -> bool {
        let next = files.first().map(|f| f.path.clone());
        if next == self.value {
            return false;
        }
        self.value = next;
        true
    }

    fn reset(&mut self) {
        self.value = None;
        self.generation += 1;
    }

    /// Current control value.
    pub fn value(&self) -> Option<&PathBuf> {
        self.value.as_ref()
    }

    /// Bumped on every reset; presentation can key the widget on it.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the dual-mode form input.
#[derive(Debug, Clone)]
pub struct InputReconciler {
    state: InputState,
    text_error: Option<ValidationError>,
    file_control: FileControl,
    accepted_extensions: Vec<String>,
}

impl InputReconciler {
    /// Create a reconciler accepting the given extensions (lowercase, no dot).
    pub fn new(accepted_extensions: Vec<String>) -> Self {
        Self {
            state: InputState::Empty,
            text_error: None,
            file_control: FileControl::default(),
            accepted_extensions,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Validation error shown next to the text field, if any.
    pub fn text_error(&self) -> Option<&ValidationError> {
        self.text_error.as_ref()
    }

    pub fn file_control(&self) -> &FileControl {
        &self.file_control
    }

    /// Text field edited. Ignored while a file is selected, since the text
    /// field is disabled then. Returns whether the state changed.
    pub fn on_text_changed(&mut self, text: &str) -> bool {
        if self.state.has_file() {
            debug!("Text change ignored while a file is selected");
            return false;
        }

        self.state = if text.is_empty() {
            InputState::Empty
        } else {
            InputState::Text(text.to_string())
        };

        if !text.trim().is_empty() {
            self.text_error = None;
        }
        true
    }

    /// Files chosen in the file control. The first file wins; an empty list
    /// clears the selection. Any typed text is dropped.
    pub fn on_file_selected(&mut self, files: Vec<SelectedFile>) -> Result<(), ValidationError> {
        let Some(file) = files.into_iter().next() else {
            if self.state.has_file() {
                self.state = InputState::Empty;
            }
            return Ok(());
        };

        if !self.accepts(&file) {
            debug!(file_name = %file.name, "Rejected file with unsupported extension");
            return Err(ValidationError::UnsupportedFileType {
                file_name: file.name,
            });
        }

        if self.state.has_text() {
            debug!(file_name = %file.name, "File selected; discarding typed text");
        }
        self.state = InputState::File(file);
        self.text_error = None;
        Ok(())
    }

    /// Pick files through the control. Returns `Ok(false)` when the control
    /// already holds the same path and no change fires.
    pub fn choose_files(&mut self, files: Vec<SelectedFile>) -> Result<bool, ValidationError> {
        if !self.file_control.choose(&files) {
            return Ok(false);
        }
        match self.on_file_selected(files) {
            Ok(()) => Ok(true),
            Err(e) => {
                self.file_control.reset();
                Err(e)
            }
        }
    }

    /// Clear the selected file and reset the control so the same path can be
    /// chosen again.
    pub fn on_file_cleared(&mut self) {
        if self.state.has_file() {
            self.state = InputState::Empty;
        }
        self.file_control.reset();
    }

    /// Check the current input. Pure: repeated calls on an unmodified
    /// reconciler give the same answer.
    ///
    /// Whitespace-only text counts as missing input.
    pub fn validate(&self) -> Result<NormalizedPayload, ValidationError> {
        match &self.state {
            InputState::File(file) => Ok(NormalizedPayload::File(file.clone())),
            InputState::Text(text) if !text.trim().is_empty() => {
                Ok(NormalizedPayload::Text(text.clone()))
            }
            _ => Err(ValidationError::MissingInput),
        }
    }

    /// Submit the form: validate, and on failure record the inline error.
    pub fn handle_submit(&mut self) -> Option<NormalizedPayload> {
        match self.validate() {
            Ok(payload) => Some(payload),
            Err(e) => {
                self.text_error = Some(e);
                None
            }
        }
    }

    /// Which controls are usable, given whether a submission is in flight.
    pub fn policy(&self, loading: bool) -> InteractionPolicy {
        let has_file = self.state.has_file();
        InteractionPolicy {
            text_enabled: !has_file && !loading,
            file_enabled: !self.state.has_text() && !loading,
            clear_file_visible: has_file,
            clear_file_enabled: !loading,
            submit_enabled: !loading,
        }
    }

    /// Caption under the file control, e.g. "Arquivo selecionado: invoice.pdf".
    pub fn selected_file_caption(&self) -> Option<String> {
        self.state
            .file()
            .map(|f| format!("Arquivo selecionado: {}", f.name))
    }

    fn accepts(&self, file: &SelectedFile) -> bool {
        file.extension()
            .is_some_and(|ext| self.accepted_extensions.iter().any(|a| *a == ext))
    }
}

impl Default for InputReconciler {
    fn default() -> Self {
        Self::new(vec!["txt".to_string(), "pdf".to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SelectedFile {
        SelectedFile::from_path(path)
    }

    // ── validate ────────────────────────────────────────────────────

    #[test]
    fn empty_form_is_missing_input() {
        let r = InputReconciler::default();
        assert_eq!(r.validate(), Err(ValidationError::MissingInput));
    }

    #[test]
    fn whitespace_text_is_missing_input() {
        let mut r = InputReconciler::default();
        r.on_text_changed("   \n\t");
        assert_eq!(r.validate(), Err(ValidationError::MissingInput));
    }

    #[test]
    fn text_becomes_text_payload() {
        let mut r = InputReconciler::default();
        r.on_text_changed("Please confirm receipt");
        assert_eq!(
            r.validate(),
            Ok(NormalizedPayload::Text("Please confirm receipt".into()))
        );
    }

    #[test]
    fn file_wins_over_earlier_text() {
        let mut r = InputReconciler::default();
        r.on_text_changed("draft");
        r.on_file_selected(vec![file("invoice.pdf")]).unwrap();
        assert_eq!(r.validate(), Ok(NormalizedPayload::File(file("invoice.pdf"))));
        assert_eq!(r.state().text(), None);
    }

    #[test]
    fn validate_is_idempotent() {
        let mut r = InputReconciler::default();
        assert_eq!(r.validate(), r.validate());
        r.on_text_changed("hello");
        let first = r.validate();
        assert_eq!(first, r.validate());
        assert_eq!(first, r.validate());
        assert!(r.text_error().is_none());
    }

    // ── text / file channels ────────────────────────────────────────

    #[test]
    fn first_file_of_list_is_taken() {
        let mut r = InputReconciler::default();
        r.on_file_selected(vec![file("a.txt"), file("b.txt")]).unwrap();
        assert_eq!(r.state().file().map(|f| f.name.as_str()), Some("a.txt"));
    }

    #[test]
    fn empty_file_list_clears_file() {
        let mut r = InputReconciler::default();
        r.on_file_selected(vec![file("a.txt")]).unwrap();
        r.on_file_selected(vec![]).unwrap();
        assert_eq!(r.state(), &InputState::Empty);
    }

    #[test]
    fn empty_file_list_keeps_text() {
        let mut r = InputReconciler::default();
        r.on_text_changed("hello");
        r.on_file_selected(vec![]).unwrap();
        assert_eq!(r.state().text(), Some("hello"));
    }

    #[test]
    fn text_ignored_while_file_selected() {
        let mut r = InputReconciler::default();
        r.on_file_selected(vec![file("a.txt")]).unwrap();
        assert!(!r.on_text_changed("typed anyway"));
        assert!(r.state().has_file());
    }

    #[test]
    fn clearing_text_returns_to_empty() {
        let mut r = InputReconciler::default();
        r.on_text_changed("x");
        r.on_text_changed("");
        assert_eq!(r.state(), &InputState::Empty);
    }

    #[test]
    fn unsupported_file_rejected_and_state_kept() {
        let mut r = InputReconciler::default();
        r.on_text_changed("keep me");
        let err = r.on_file_selected(vec![file("photo.jpg")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnsupportedFileType {
                file_name: "photo.jpg".into()
            }
        );
        assert_eq!(r.state().text(), Some("keep me"));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let mut r = InputReconciler::default();
        assert!(r.on_file_selected(vec![file("MAIL.TXT")]).is_ok());
    }

    // ── inline error ────────────────────────────────────────────────

    #[test]
    fn submit_without_input_records_error() {
        let mut r = InputReconciler::default();
        assert!(r.handle_submit().is_none());
        assert_eq!(r.text_error(), Some(&ValidationError::MissingInput));
    }

    #[test]
    fn typing_clears_error_only_when_non_blank() {
        let mut r = InputReconciler::default();
        r.handle_submit();
        r.on_text_changed("   ");
        assert!(r.text_error().is_some());
        r.on_text_changed("  ok ");
        assert!(r.text_error().is_none());
    }

    #[test]
    fn selecting_file_clears_error() {
        let mut r = InputReconciler::default();
        r.handle_submit();
        r.on_file_selected(vec![file("a.pdf")]).unwrap();
        assert!(r.text_error().is_none());
    }

    // ── interaction policy ──────────────────────────────────────────

    #[test]
    fn file_disables_text_field() {
        let mut r = InputReconciler::default();
        r.on_file_selected(vec![file("invoice.pdf")]).unwrap();
        let p = r.policy(false);
        assert!(!p.text_enabled);
        assert!(p.file_enabled);
        assert!(p.clear_file_visible);
    }

    #[test]
    fn text_disables_file_field() {
        let mut r = InputReconciler::default();
        r.on_text_changed("hello");
        let p = r.policy(false);
        assert!(p.text_enabled);
        assert!(!p.file_enabled);
        assert!(!p.clear_file_visible);
    }

    #[test]
    fn never_both_editable() {
        let mut r = InputReconciler::default();
        for step in 0..4 {
            match step {
                0 => {
                    r.on_text_changed("a");
                }
                1 => {
                    r.on_text_changed("");
                    r.on_file_selected(vec![file("a.txt")]).unwrap();
                }
                2 => r.on_file_cleared(),
                _ => {
                    r.on_text_changed("b");
                }
            }
            let p = r.policy(false);
            if *r.state() != InputState::Empty {
                assert!(!(p.text_enabled && p.file_enabled), "step {step}");
            }
        }
    }

    #[test]
    fn loading_disables_everything() {
        let r = InputReconciler::default();
        let p = r.policy(true);
        assert!(!p.text_enabled);
        assert!(!p.file_enabled);
        assert!(!p.clear_file_enabled);
        assert!(!p.submit_enabled);
    }

    // ── file control ────────────────────────────────────────────────

    #[test]
    fn same_path_without_clear_fires_no_change() {
        let mut r = InputReconciler::default();
        assert_eq!(r.choose_files(vec![file("/in/a.txt")]), Ok(true));
        assert_eq!(r.choose_files(vec![file("/in/a.txt")]), Ok(false));
    }

    #[test]
    fn clear_allows_same_path_again() {
        let mut r = InputReconciler::default();
        r.choose_files(vec![file("/in/a.txt")]).unwrap();
        let gen_before = r.file_control().generation();

        r.on_file_cleared();
        assert_eq!(r.state(), &InputState::Empty);
        assert!(r.file_control().value().is_none());
        assert_eq!(r.file_control().generation(), gen_before + 1);

        assert_eq!(r.choose_files(vec![file("/in/a.txt")]), Ok(true));
        assert!(r.state().has_file());
    }

    #[test]
    fn rejected_choice_resets_control() {
        let mut r = InputReconciler::default();
        assert!(r.choose_files(vec![file("/in/a.png")]).is_err());
        assert!(r.file_control().value().is_none());
    }

    #[test]
    fn caption_names_selected_file() {
        let mut r = InputReconciler::default();
        assert!(r.selected_file_caption().is_none());
        r.on_file_selected(vec![file("/x/invoice.pdf")]).unwrap();
        assert_eq!(
            r.selected_file_caption().as_deref(),
            Some("Arquivo selecionado: invoice.pdf")
        );
    }
}
