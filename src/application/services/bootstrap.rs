use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::errors::BotError;
use crate::application::messaging::{EventRouter, RouterRules};
use crate::domain::traits::{Messenger, Session, SessionFactory};
use crate::infrastructure::config::Config;

/// Brings the bot up and keeps it running until cancelled
pub struct Bootstrap {
    config: Config,
}

impl Bootstrap {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build session, fetch identity, attach the router, open, then wait for `shutdown`.
    ///
    /// Any startup failure is returned before the gateway is opened. Cancelling
    /// `shutdown` while the identity fetch or the handshake is still pending closes the
    /// session and returns `Ok`.
    pub async fn run<F>(&self, factory: &F, shutdown: CancellationToken) -> Result<(), BotError>
    where
        F: SessionFactory,
    {
        if let Some((prefix, trigger)) = self.config.trigger_mismatch() {
            tracing::warn!(
                "BotPrefix {:?} is not used for matching; relaying on trigger {:?}",
                prefix,
                trigger
            );
        }

        let mut session = factory.create(&self.config.token)?;
        let identity = tokio::select! {
            biased;
            identity = session.current_user() => Some(identity),
            _ = shutdown.cancelled() => None,
        };
        let Some(identity) = identity.transpose()? else {
            tracing::info!("Shutdown requested before authentication finished");
            return Ok(());
        };
        tracing::info!("Authenticated as {}", identity);

        let router = EventRouter::new(identity, RouterRules::from_config(&self.config));
        session.on_message_create(Arc::new(router));

        let opened = tokio::select! {
            biased;
            opened = session.open() => Some(opened),
            _ = shutdown.cancelled() => None,
        };
        if opened.transpose()?.is_none() {
            tracing::info!("Shutdown requested during gateway handshake");
            session.close().await;
            return Ok(());
        }

        tracing::info!("Bot is running");
        shutdown.cancelled().await;

        tracing::info!("Shutdown requested, closing session");
        session.close().await;
        Ok(())
    }
}
