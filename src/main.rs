//! flamechat terminal client.
//!
//! The thinnest possible presentation layer over the sync core: flags/env
//! for configuration, stdin for the chat input line, stdout for the message
//! list. Everything stateful lives in the library.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::Rng;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use flamechat::controller::{BootstrapOutcome, Controller};
use flamechat::event::{COLORSET, ChatEntry, DEFAULT_BG_COLOR, Event};
use flamechat::net::api::{ApiError, HttpBackend};
use flamechat::net::stream::{self, StreamError};
use flamechat::token::CredentialStore;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("authentication failed: {0}")]
    Auth(#[from] ApiError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("no valid stored token; pass --username and --password (add --sign-up for a new account)")]
    MissingCredentials,
}

#[derive(Parser, Debug)]
#[command(name = "flamechat", about = "Terminal client for the flamechat room")]
struct Cli {
    #[arg(long, env = "FLAMECHAT_BASE_URL", default_value = "http://127.0.0.1:4000")]
    base_url: String,

    /// Where the identity token is persisted between sessions.
    #[arg(long, env = "FLAMECHAT_CREDENTIALS", default_value = ".flamechat-credentials.json")]
    credentials: PathBuf,

    #[arg(long, env = "FLAMECHAT_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "FLAMECHAT_PASSWORD")]
    password: Option<String>,

    /// Register a new account instead of logging in.
    #[arg(long, default_value_t = false)]
    sign_up: bool,

    /// Bubble color for a new account. Random palette pick when omitted.
    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    bg_color: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let backend = Arc::new(HttpBackend::new(&cli.base_url));
    let store = CredentialStore::new(&cli.credentials);
    let (mut controller, mut outbound) = Controller::new(backend, store);

    if controller.bootstrap().await == BootstrapOutcome::PromptRequired {
        prompt_fallback(&mut controller, &cli).await?;
    }

    for entry in controller.state.log.entries() {
        print_entry(entry);
    }

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_stdin(input_tx));

    // Local sends are already visible as the typed line; only print peers.
    let own_username = controller
        .state
        .identity
        .as_ref()
        .map(|i| i.username.clone())
        .unwrap_or_default();
    let mut on_event = move |event: &Event| {
        if let Event::Message(entry) = event {
            if entry.username != own_username {
                print_entry(entry);
            }
        }
    };

    stream::run(
        &cli.base_url,
        &mut controller,
        &mut outbound,
        &mut input_rx,
        true,
        &mut on_event,
    )
    .await?;
    Ok(())
}

/// The login/registration prompt, rendered as flags. Login by default;
/// `--sign-up` registers with the chosen or a randomly picked color.
async fn prompt_fallback(controller: &mut Controller, cli: &Cli) -> Result<(), AppError> {
    let (Some(username), Some(password)) = (cli.username.as_deref(), cli.password.as_deref()) else {
        return Err(AppError::MissingCredentials);
    };

    if cli.sign_up {
        let color = cli
            .color
            .clone()
            .unwrap_or_else(|| COLORSET[rand::rng().random_range(0..COLORSET.len())].to_owned());
        let bg_color = cli
            .bg_color
            .clone()
            .unwrap_or_else(|| DEFAULT_BG_COLOR.to_owned());
        controller.register(username, password, &color, &bg_color).await?;
    } else {
        controller.login(username, password).await?;
    }
    Ok(())
}

/// Forward stdin lines into the session until EOF.
async fn read_stdin(tx: mpsc::UnboundedSender<String>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).is_err() {
            break;
        }
    }
}

fn print_entry(entry: &ChatEntry) {
    println!("{}: {}", entry.username, entry.message);
}
