/// A channel webhook. The platform only returns a token for incoming webhooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub id: String,
    pub token: Option<String>,
    pub channel_id: String,
    pub name: Option<String>,
}

impl Webhook {
    /// Token required for executing the webhook
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Split a copied webhook URL into its `(id, token)` pair.
///
/// Accepts `https://discord.com/api/webhooks/{id}/{token}` and the versioned
/// `/api/v10/webhooks/...` form. Query strings are ignored.
pub fn parse_webhook_url(url: &str) -> Option<(String, String)> {
    let path = url.split(['?', '#']).next()?;
    let mut segments = path.trim_end_matches('/').rsplit('/');
    let token = segments.next()?;
    let id = segments.next()?;
    let marker = segments.next()?;

    if marker != "webhooks" || token.is_empty() || id.parse::<u64>().is_err() {
        return None;
    }
    Some((id.to_string(), token.to_string()))
}
