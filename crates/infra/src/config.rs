//! Coordinator configuration.

use std::time::Duration;

use anyhow::{Context, Result, bail};

use pawtrack_inventory::ExpirationPolicy;

/// Tuning for [`crate::StockCoordinator`] and [`crate::InventoryQueries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Attempts per operation when a version-conditioned write loses.
    pub max_attempts: u32,
    /// How long to wait for the per-item lock before giving up.
    pub lock_timeout: Duration,
    /// Attempts at appending a ledger entry before compensating.
    pub ledger_append_attempts: u32,
    pub expiration: ExpirationPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lock_timeout: Duration::from_secs(5),
            ledger_append_attempts: 3,
            expiration: ExpirationPolicy::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn with_ledger_append_attempts(mut self, attempts: u32) -> Self {
        self.ledger_append_attempts = attempts.max(1);
        self
    }

    pub fn with_expiration(mut self, expiration: ExpirationPolicy) -> Self {
        self.expiration = expiration;
        self
    }

    /// Defaults overridden by `PAWTRACK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("PAWTRACK_MAX_ATTEMPTS") {
            config.max_attempts = parse_positive(&raw).context("PAWTRACK_MAX_ATTEMPTS")?;
        }
        if let Some(raw) = lookup("PAWTRACK_LOCK_TIMEOUT_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .context("PAWTRACK_LOCK_TIMEOUT_MS must be an integer")?;
            config.lock_timeout = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup("PAWTRACK_LEDGER_APPEND_ATTEMPTS") {
            config.ledger_append_attempts =
                parse_positive(&raw).context("PAWTRACK_LEDGER_APPEND_ATTEMPTS")?;
        }
        if let Some(raw) = lookup("PAWTRACK_EXPIRING_SOON_DAYS") {
            let days: i64 = raw
                .trim()
                .parse()
                .context("PAWTRACK_EXPIRING_SOON_DAYS must be an integer")?;
            if days < 0 {
                bail!("PAWTRACK_EXPIRING_SOON_DAYS cannot be negative");
            }
            config.expiration = ExpirationPolicy::within_days(days);
        }

        Ok(config)
    }
}

fn parse_positive(raw: &str) -> Result<u32> {
    let value: u32 = raw.trim().parse().context("must be a positive integer")?;
    if value == 0 {
        bail!("must be at least 1");
    }
    Ok(value)
}
