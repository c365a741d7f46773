//! Auth Config

use clap::Args;
use jiff::SignedDuration;

/// Thirty days.
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 30 * 24;

/// API token settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Lifetime of issued API tokens in hours; `0` issues tokens that never expire
    #[arg(long, env = "API_TOKEN_TTL_HOURS", default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
    pub api_token_ttl_hours: u32,
}

impl AuthConfig {
    /// Lifetime of issued API tokens.
    #[must_use]
    pub fn token_ttl(&self) -> Option<SignedDuration> {
        (self.api_token_ttl_hours > 0)
            .then(|| SignedDuration::from_hours(i64::from(self.api_token_ttl_hours)))
    }
}
