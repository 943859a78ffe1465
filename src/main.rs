// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Multired command-line client
//!
//! Logs in, chats with the media assistant, and publishes generated media to
//! the linked social networks through the Multired backend.

use clap::{Args, Parser, Subcommand};
use multired_client::{
    config::Config,
    error::ClientError,
    models::{file_name_from_path, Message, Network, Role},
    navigation::Route,
    services::{ConnectionCallback, LoginProvider, MediaFile},
    Client,
};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "multired", about = "Multired chat and publishing client")]
struct Cli {
    /// Backend API base URL (overrides MULTIRED_API_URL)
    #[arg(long, env = "MULTIRED_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MULTIRED_PASSWORD")]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MULTIRED_PASSWORD")]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show whether the stored session is valid
    Status,
    /// Print the URL for signing in with a social provider
    OauthUrl { provider: OauthProvider },
    /// Store the token from an OAuth callback URL
    OauthCallback { url: String },
    /// Manage conversations
    Conversations(ConversationsCommand),
    /// Send a prompt to the assistant
    Send {
        conversation_id: u64,
        prompt: String,
        /// Keep polling until generated media is ready
        #[arg(long)]
        wait: bool,
        /// Give up waiting after this many seconds
        #[arg(long, default_value_t = 600)]
        timeout: u64,
    },
    /// Publish a message's generated media to a network
    Publish {
        conversation_id: u64,
        message_id: u64,
        network: String,
    },
    /// Manage linked social accounts
    Accounts(AccountsCommand),
    /// Upload media directly
    Upload(UploadCommand),
    /// Print the preview URL for a media file or path
    MediaUrl { file: String },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OauthProvider {
    Google,
    Facebook,
}

#[derive(Args, Debug)]
struct ConversationsCommand {
    #[command(subcommand)]
    command: ConversationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ConversationsSubcommand {
    List,
    Create,
    Show { id: u64 },
    Delete { id: u64 },
    Rename { id: u64, title: String },
}

#[derive(Args, Debug)]
struct AccountsCommand {
    #[command(subcommand)]
    command: AccountsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AccountsSubcommand {
    List,
    Connect {
        network: String,
    },
    Disconnect {
        network: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Handle the provider's redirect back (`?connected=` / `?error=`)
    Callback {
        url: String,
    },
    FacebookInfo,
}

#[derive(Args, Debug)]
struct UploadCommand {
    #[command(subcommand)]
    command: UploadSubcommand,
}

#[derive(Subcommand, Debug)]
enum UploadSubcommand {
    TiktokVideo {
        path: std::path::PathBuf,
        #[arg(long)]
        caption: String,
    },
    FacebookPhoto {
        path: std::path::PathBuf,
        #[arg(long)]
        message: String,
    },
    InstagramPhoto {
        path: std::path::PathBuf,
        #[arg(long)]
        caption: String,
    },
    FacebookPost {
        #[arg(long)]
        message: String,
        #[arg(long)]
        link: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    tracing::debug!(api_url = %config.api_url, "Starting Multired client");

    let client = Client::from_config(config);

    match run(&client, cli.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Some(route) = e.route() {
                eprintln!("{}. Log in again (next: {}).", e, route);
            } else {
                eprintln!("{}", e);
            }
            std::process::exit(1);
        }
    }
}

async fn run(client: &Client, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Login { email, password } => {
            let route = client.auth.login(&email, &password).await?;
            println!("Logged in as {} (next: {})", email, route);
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            client.auth.register(&name, &email, &password).await?;
            println!("Registered {}", email);
        }
        Command::Logout => {
            let route = client.auth.logout()?;
            println!("Logged out (next: {})", route);
        }
        Command::Status => match client.session.claims() {
            Some(claims) if client.session.is_authenticated() => {
                let expires = claims
                    .expires_at()
                    .map(multired_client::time_utils::format_utc_rfc3339)
                    .unwrap_or_default();
                println!(
                    "Authenticated (user {}), expires {}",
                    claims
                        .id
                        .map_or_else(|| "unknown".to_string(), |id| id.to_string()),
                    expires
                );
            }
            _ => println!("Not authenticated"),
        },
        Command::OauthUrl { provider } => {
            let provider = match provider {
                OauthProvider::Google => LoginProvider::Google,
                OauthProvider::Facebook => LoginProvider::Facebook,
            };
            println!("{}", client.auth.oauth_login_url(provider));
        }
        Command::OauthCallback { url } => {
            let route = client.auth.handle_oauth_callback(&url)?;
            println!("Session stored (next: {})", route);
        }
        Command::Conversations(cmd) => run_conversations(client, cmd.command).await?,
        Command::Send {
            conversation_id,
            prompt,
            wait,
            timeout,
        } => {
            let chat = client.chat();
            chat.open_conversation(conversation_id).await?;
            chat.send_message(&prompt).await?;
            if wait && chat.is_polling() {
                println!("Waiting for media generation...");
                let limit = std::time::Duration::from_secs(timeout);
                if !chat.wait_until_settled_for(limit).await {
                    chat.stop_polling();
                    println!("Media still generating after {}s, stopped waiting", timeout);
                }
            }
            print_messages(client, &chat.messages());
        }
        Command::Publish {
            conversation_id,
            message_id,
            network,
        } => {
            let chat = client.chat();
            chat.open_conversation(conversation_id).await?;
            let result = chat.publish_by_name(message_id, &network).await;
            if let Some(notice) = chat.success_notice().or_else(|| chat.error_notice()) {
                println!("{}", notice);
            }
            result?;
        }
        Command::Accounts(cmd) => run_accounts(client, cmd.command).await?,
        Command::Upload(cmd) => run_upload(client, cmd.command).await?,
        Command::MediaUrl { file } => {
            println!("{}", client.chatbot.media_url(file_name_from_path(&file)));
        }
    }
    Ok(())
}

async fn run_conversations(
    client: &Client,
    command: ConversationsSubcommand,
) -> Result<(), ClientError> {
    match command {
        ConversationsSubcommand::List => {
            for c in client.conversations.list().await? {
                println!(
                    "{:>6}  {}  {}",
                    c.id,
                    c.updated_at.as_deref().unwrap_or("-"),
                    c.title
                );
            }
        }
        ConversationsSubcommand::Create => {
            let c = client.conversations.create().await?;
            println!("Created conversation {}", c.id);
        }
        ConversationsSubcommand::Show { id } => {
            let detail = client.conversations.get(id).await?;
            println!("# {} ({})", detail.title, detail.id);
            print_messages(client, &detail.messages);
        }
        ConversationsSubcommand::Delete { id } => {
            client.conversations.delete(id).await?;
            println!("Deleted conversation {}", id);
        }
        ConversationsSubcommand::Rename { id, title } => {
            let c = client.conversations.update_title(id, &title).await?;
            println!("Conversation {} is now \"{}\"", c.id, c.title);
        }
    }
    Ok(())
}

async fn run_accounts(client: &Client, command: AccountsSubcommand) -> Result<(), ClientError> {
    match command {
        AccountsSubcommand::List => {
            let accounts = client.social.refresh().await?;
            for network in Network::ALL {
                let mark = if accounts.is_connected(network.slug()) {
                    "connected"
                } else {
                    "-"
                };
                println!("{:<10} {}", network, mark);
            }
        }
        AccountsSubcommand::Connect { network } => {
            let network: Network = network.parse()?;
            match client.social.connect(network).await? {
                Route::External(url) => println!("Open this URL to connect {}:\n{}", network, url),
                route => println!("Not logged in (next: {})", route),
            }
        }
        AccountsSubcommand::Disconnect { network, yes } => {
            let network: Network = network.parse()?;
            if !yes && !confirm(&format!("¿Estás seguro de desconectar {}?", network)) {
                println!("Cancelled");
                return Ok(());
            }
            let accounts = client.social.disconnect(network).await?;
            println!(
                "{} disconnected ({} account(s) still linked)",
                network,
                accounts.len()
            );
        }
        AccountsSubcommand::Callback { url } => match client.social.handle_callback(&url).await? {
            Some(ConnectionCallback::Connected(provider)) => println!("{} connected", provider),
            Some(ConnectionCallback::Failed(provider)) => {
                println!("Error al conectar {}. Intenta nuevamente.", provider)
            }
            None => println!("No connection result in URL"),
        },
        AccountsSubcommand::FacebookInfo => {
            let info = client.social.facebook_account_info().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&info).unwrap_or_else(|_| info.to_string())
            );
        }
    }
    Ok(())
}

async fn run_upload(client: &Client, command: UploadSubcommand) -> Result<(), ClientError> {
    let response = match command {
        UploadSubcommand::TiktokVideo { path, caption } => {
            let video = MediaFile::from_path(&path).await?;
            client.uploads.publish_tiktok_video(video, &caption).await?
        }
        UploadSubcommand::FacebookPhoto { path, message } => {
            let photo = MediaFile::from_path(&path).await?;
            client.uploads.publish_facebook_photo(photo, &message).await?
        }
        UploadSubcommand::InstagramPhoto { path, caption } => {
            let photo = MediaFile::from_path(&path).await?;
            client.uploads.publish_instagram_photo(photo, &caption).await?
        }
        UploadSubcommand::FacebookPost { message, link } => {
            client
                .uploads
                .publish_facebook_post(&message, link.as_deref())
                .await?
        }
    };

    match response.get("message").and_then(|m| m.as_str()) {
        Some(message) => println!("{}", message),
        None => println!("Publicado exitosamente"),
    }
    Ok(())
}

fn print_messages(client: &Client, messages: &[Message]) {
    for message in messages {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!(
            "[{}] {}: {}",
            message.id,
            who,
            message.content.text.as_deref().unwrap_or("")
        );
        if message.is_processing() {
            println!("    (generating media...)");
        }
        for (network, content) in message.content.networks() {
            let Some(path) = content.media_path() else {
                continue;
            };
            let state = if message.is_published_to(network) {
                "published"
            } else if message.can_publish_to(network) {
                "ready"
            } else {
                "pending"
            };
            println!(
                "    {:<10} {:<9} {}",
                network,
                state,
                client.chatbot.media_url(file_name_from_path(path))
            );
        }
    }
}

fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "s" | "si" | "sí")
}

/// Initialize logging to stderr; JSON lines when `MULTIRED_LOG_JSON` is set.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("multired_client=info,multired=info"));

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var_os("MULTIRED_LOG_JSON").is_some() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .init();
    }
}
