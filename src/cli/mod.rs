//! Terminal front end for the email form.
//!
//! The session owns the form input; the controller owns the submission
//! state. Submissions run on their own task so the prompt stays responsive
//! and `/submit` can be refused while one is loading.

pub mod command;
pub mod render;

use std::sync::Arc;

use tokio::task::JoinHandle;

pub use command::FormCommand;

use crate::form::{InputReconciler, SelectedFile};
use crate::submission::{SubmissionController, SubmissionToken};

/// What the session wants shown after a command.
#[derive(Debug, Default)]
pub struct SessionReply {
    pub lines: Vec<String>,
    pub quit: bool,
    /// Set when a submission was started.
    pub submission: Option<JoinHandle<SubmissionToken>>,
}

impl SessionReply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            ..Default::default()
        }
    }
}

/// One interactive form.
pub struct FormSession {
    reconciler: InputReconciler,
    controller: Arc<SubmissionController>,
}

impl FormSession {
    pub fn new(reconciler: InputReconciler, controller: Arc<SubmissionController>) -> Self {
        Self {
            reconciler,
            controller,
        }
    }

    pub fn reconciler(&self) -> &InputReconciler {
        &self.reconciler
    }

    pub fn controller(&self) -> &Arc<SubmissionController> {
        &self.controller
    }

    pub async fn handle(&mut self, command: FormCommand) -> SessionReply {
        let loading = self.controller.is_loading().await;
        let policy = self.reconciler.policy(loading);

        match command {
            FormCommand::Text(line) => {
                if !policy.text_enabled {
                    return SessionReply::line("Campo de texto desativado.");
                }
                let text = match self.reconciler.state().text() {
                    Some(existing) => format!("{existing}\n{line}"),
                    None => line,
                };
                self.reconciler.on_text_changed(&text);
                SessionReply::default()
            }
            FormCommand::ClearText => {
                if !policy.text_enabled {
                    return SessionReply::line("Campo de texto desativado.");
                }
                self.reconciler.on_text_changed("");
                SessionReply::line("Texto apagado.")
            }
            FormCommand::ChooseFile(path) => {
                if !policy.file_enabled {
                    return SessionReply::line("Upload de arquivo desativado.");
                }
                let files = match path {
                    Some(path) if !path.is_file() => {
                        return SessionReply::line(format!(
                            "Arquivo não encontrado: {}",
                            path.display()
                        ));
                    }
                    Some(path) => vec![SelectedFile::from_path(path)],
                    None => vec![],
                };
                match self.reconciler.choose_files(files) {
                    Ok(_) => SessionReply::line(
                        self.reconciler
                            .selected_file_caption()
                            .unwrap_or_else(|| "Nenhum arquivo selecionado.".to_string()),
                    ),
                    Err(e) => SessionReply::line(e.to_string()),
                }
            }
            FormCommand::ClearFile => {
                if !policy.clear_file_visible || !policy.clear_file_enabled {
                    return SessionReply::line("Nenhum arquivo para remover.");
                }
                self.reconciler.on_file_cleared();
                SessionReply::line("Arquivo removido.")
            }
            FormCommand::Submit => self.submit(policy.submit_enabled).await,
            FormCommand::Status => {
                let state = self.controller.state().await;
                let mut lines = vec![
                    render::render_form(&self.reconciler, loading),
                    render::render_state(&state),
                ];
                if self.controller.error_dialog_open().await {
                    if let Some(msg) = state.error() {
                        lines.push(render::render_error_dialog(msg));
                    }
                }
                SessionReply {
                    lines,
                    ..Default::default()
                }
            }
            FormCommand::Dismiss => {
                self.controller.dismiss_error().await;
                SessionReply::default()
            }
            FormCommand::Help => SessionReply::line(command::HELP),
            FormCommand::Quit => SessionReply {
                quit: true,
                ..Default::default()
            },
            FormCommand::Unknown(cmd) => {
                SessionReply::line(format!("Comando desconhecido: {cmd} (/help)"))
            }
        }
    }

    async fn submit(&mut self, enabled: bool) -> SessionReply {
        if !enabled {
            return SessionReply::line("Analisando... aguarde o resultado atual.");
        }
        let Some(payload) = self.reconciler.handle_submit() else {
            let msg = self
                .reconciler
                .text_error()
                .map(|e| e.to_string())
                .unwrap_or_default();
            return SessionReply::line(msg);
        };

        // Enter `Loading` before the next command is read.
        let token = self.controller.begin().await;
        let controller = Arc::clone(&self.controller);
        let handle = tokio::spawn(async move {
            controller.finish(token, payload).await;
            token
        });
        SessionReply {
            lines: vec!["Analisando e-mail...".to_string()],
            submission: Some(handle),
            ..Default::default()
        }
    }
}
