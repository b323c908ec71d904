//! Plain-text rendering of form and submission state.

use crate::form::{InputReconciler, InputState};
use crate::submission::SubmissionState;

pub fn render_state(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "Pronto para analisar.".to_string(),
        SubmissionState::Loading => {
            "Analisando e-mail... Isso pode levar alguns segundos.".to_string()
        }
        SubmissionState::Succeeded(result) => format!(
            "Resultados da Análise\n  Classificação: {}\n  Resposta Sugerida: {}",
            result.classification, result.suggested_response
        ),
        SubmissionState::Failed(message) => format!("Última tentativa falhou: {message}"),
    }
}

pub fn render_error_dialog(message: &str) -> String {
    format!("Erro ao Processar E-mail\n  {message}\n  (/dismiss para fechar)")
}

pub fn render_form(reconciler: &InputReconciler, loading: bool) -> String {
    let policy = reconciler.policy(loading);
    let mut lines = Vec::new();

    match reconciler.state() {
        InputState::Empty => lines.push("Conteúdo do E-mail: (vazio)".to_string()),
        InputState::Text(text) => {
            lines.push(format!("Conteúdo do E-mail: {} caracteres", text.chars().count()))
        }
        InputState::File(_) => lines.push("Conteúdo do E-mail: (desativado)".to_string()),
    }
    if let Some(caption) = reconciler.selected_file_caption() {
        lines.push(caption);
    }
    if let Some(err) = reconciler.text_error() {
        lines.push(format!("! {err}"));
    }

    let flag = |on: bool| if on { "sim" } else { "não" };
    lines.push(format!(
        "texto: {} | arquivo: {} | enviar: {}",
        flag(policy.text_enabled),
        flag(policy.file_enabled),
        flag(policy.submit_enabled)
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SelectedFile;
    use crate::submission::{Classification, ProcessingResult};

    #[test]
    fn succeeded_shows_label_and_reply() {
        let out = render_state(&SubmissionState::Succeeded(ProcessingResult {
            classification: Classification::Produtivo,
            suggested_response: "Obrigado, vamos verificar.".into(),
        }));
        assert!(out.contains("Classificação: Produtivo"));
        assert!(out.contains("Obrigado, vamos verificar."));
    }

    #[test]
    fn form_shows_caption_and_disabled_text() {
        let mut r = InputReconciler::default();
        r.on_file_selected(vec![SelectedFile::from_path("invoice.pdf")])
            .unwrap();
        let out = render_form(&r, false);
        assert!(out.contains("Arquivo selecionado: invoice.pdf"));
        assert!(out.contains("texto: não"));
    }

    #[test]
    fn form_shows_inline_error() {
        let mut r = InputReconciler::default();
        r.handle_submit();
        assert!(render_form(&r, false).contains("É necessário fornecer"));
    }
}
