use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Inputs for registering a webhook. Deliberately does not derive `Debug` so
/// the clear client secret cannot end up in log output.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateParams {
    /// LinkedIn application client ID that owns the webhook
    pub(crate) client_id: String,
    /// LinkedIn application client secret, stored encrypted
    pub(crate) client_secret: String,
    /// Optional caller-chosen path slug; one is generated when omitted
    #[serde(default)]
    pub(crate) custom_path: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexParams {
    /// Client ID to list webhooks for
    pub(crate) client_id: String,
}

/// Query parameters for LinkedIn's GET verification handshake. The parameter
/// name is part of LinkedIn's contract and is camelCase on the wire.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ChallengeParams {
    #[serde(rename = "challengeCode")]
    pub(crate) challenge_code: Option<String>,
}
