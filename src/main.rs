use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use taskrelay_bot::application::services::{Bootstrap, WebhookPublisher};
use taskrelay_bot::domain::traits::SessionFactory;
use taskrelay_bot::infrastructure::adapters::{DiscordSessionFactory, WebhookClient};
use taskrelay_bot::infrastructure::config::{Config, WebhookEnv};

#[derive(Parser)]
#[command(name = "taskrelay-bot")]
#[command(about = "Relays keyword-tagged Discord messages to a user by DM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (default)
    Run,
    /// Create or publish through a channel webhook
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Print a config template, or write it with --output
    InitConfig {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show version
    Version,
}

#[derive(Subcommand)]
enum WebhookAction {
    /// Create a named webhook on a channel and print its id and token
    Create {
        /// Channel to create the webhook on [default: $USERID]
        #[arg(long)]
        channel: Option<String>,

        #[arg(long, default_value = "webhook")]
        name: String,

        /// Bot token [default: $BOTTOKEN, then the config Token]
        #[arg(long)]
        token: Option<String>,
    },
    /// Post a message through an existing webhook
    Publish {
        /// Webhook id [default: $CHANNELID]
        #[arg(long)]
        webhook_id: Option<String>,

        /// Webhook token [default: $WEBHOOKTOKEN]
        #[arg(long)]
        token: Option<String>,

        /// Full webhook URL, instead of --webhook-id and --token
        #[arg(long, conflicts_with_all = ["webhook_id", "token"])]
        url: Option<String>,

        #[arg(default_value = "hello from rust")]
        content: String,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let env = WebhookEnv::from_env();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => with_runtime(run_bot(cli.config)),
        Commands::Webhook { action } => with_runtime(run_webhook(action, &cli.config, env)),
        Commands::InitConfig { output } => init_config(output),
        Commands::Version => {
            println!("taskrelay-bot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
    }
}

fn with_runtime(task: impl std::future::Future<Output = ExitCode>) -> ExitCode {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(task),
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_bot(config_path: PathBuf) -> ExitCode {
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error occurred during read config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(tokio::signal::ctrl_c(), shutdown.clone()));

    let factory = DiscordSessionFactory::new();
    match Bootstrap::new(config).run(&factory, shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error occurred during basic bot flow: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Cancel `shutdown` when `interrupt` fires. If the listener fails the token is
/// left alone and the bot keeps running.
async fn cancel_on_interrupt<F>(interrupt: F, shutdown: CancellationToken)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match interrupt.await {
        Ok(()) => {
            tracing::info!("Received interrupt");
            shutdown.cancel();
        }
        Err(e) => tracing::warn!("Failed to listen for interrupt: {}", e),
    }
}

async fn run_webhook(action: WebhookAction, config_path: &Path, env: WebhookEnv) -> ExitCode {
    match action {
        WebhookAction::Create { channel, name, token } => {
            let Some(channel) = env.create_channel(channel) else {
                tracing::error!("No channel given: pass --channel or set USERID");
                return ExitCode::FAILURE;
            };
            let token = env.bot_token_or(token, || Config::load(config_path).ok().map(|c| c.token));

            let session = match DiscordSessionFactory::new().create(&token) {
                Ok(session) => session,
                Err(e) => {
                    tracing::error!("Error occurred during create session: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            match WebhookPublisher::new(&session).create_webhook(&channel, &name).await {
                Ok(hook) => {
                    println!("{} token=> {}", hook.id, hook.token().unwrap_or("<none>"));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Error occurred during create webhook: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        WebhookAction::Publish { webhook_id, token, url, content } => {
            let Some((webhook_id, token)) = env.publish_target(webhook_id, token, url.as_deref()) else {
                tracing::error!("Webhook id and token required: pass --url, or --webhook-id and --token");
                return ExitCode::FAILURE;
            };

            let client = WebhookClient::new();
            match WebhookPublisher::new(&client).publish(&webhook_id, &token, &content).await {
                Ok(sent) => {
                    println!("{} content=> {}", sent.channel_id, sent.content);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Error occurred webhook execute: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_config(output: Option<PathBuf>) -> ExitCode {
    let Some(path) = output else {
        println!("{}", Config::template().to_json_pretty());
        println!("\nSave this to config.json and adjust as needed.");
        return ExitCode::SUCCESS;
    };

    match Config::write_template(path) {
        Ok(path) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interrupt_cancels_shutdown() {
        let shutdown = CancellationToken::new();
        cancel_on_interrupt(async { Ok(()) }, shutdown.clone()).await;
        assert!(shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn test_failed_listener_keeps_running() {
        let shutdown = CancellationToken::new();
        let failed = async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal driver")) };
        cancel_on_interrupt(failed, shutdown.clone()).await;
        assert!(!shutdown.is_cancelled());
    }
}
