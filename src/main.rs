use std::sync::Arc;

use futures::{StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use mail_triage::cli::render::{render_error_dialog, render_state};
use mail_triage::cli::{FormCommand, FormSession, command::HELP};
use mail_triage::config::ClientConfig;
use mail_triage::form::InputReconciler;
use mail_triage::submission::{ControllerEvent, HttpTransport, SubmissionController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ClientConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;

    eprintln!("📨 Mail Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Service: {}", config.process_email_url());
    eprintln!("   Accepts: {}", config.accepted_extensions.join(", "));

    match transport.health_check().await {
        Ok(message) => eprintln!("   Health: {message}"),
        Err(e) => tracing::warn!(error = %e, "Classification service health check failed"),
    }
    eprintln!("\n{HELP}\n");

    let controller = SubmissionController::new(Arc::new(transport));
    let mut events = controller.subscribe();

    // Print state changes as they arrive, independently of the prompt.
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ControllerEvent::StateChanged { state, .. }) => {
                    if !state.is_loading() {
                        println!("\n{}\n", render_state(&state));
                    }
                }
                Ok(ControllerEvent::ShowError { message, .. }) => {
                    eprintln!("\n{}\n", render_error_dialog(&message));
                }
                Err(RecvError::Lagged(n)) => {
                    tracing::debug!(skipped = n, "Event printer lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut session = FormSession::new(InputReconciler::new(config.accepted_extensions), controller);

    let reader = BufReader::new(tokio::io::stdin());
    let mut lines = Box::pin(stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                None
            }
        }
    }));

    while let Some(line) = lines.next().await {
        if line.trim().is_empty() {
            continue;
        }
        let reply = session.handle(FormCommand::parse(&line)).await;
        for out in &reply.lines {
            eprintln!("{out}");
        }
        if reply.quit {
            break;
        }
    }

    Ok(())
}
