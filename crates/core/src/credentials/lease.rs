//! Time-bounded cache credentials.

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde_json::Value;

use super::BrokerSecret;
use crate::Error;

/// Credentials for the cache backend and the instant they stop being valid.
///
/// A lease is never mutated; renewal builds a new one.
#[derive(Debug)]
pub struct CredentialLease {
    username: String,
    password: SecretString,
    expires_at: DateTime<Utc>,
}

impl CredentialLease {
    pub fn new(username: impl Into<String>, password: SecretString, expires_at: DateTime<Utc>) -> Self {
        Self { username: username.into(), password, expires_at }
    }

    /// Build a lease from a broker secret read at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Credential` if `username` or `password` is missing or
    /// not a string.
    pub fn from_secret(secret: BrokerSecret, issued_at: DateTime<Utc>) -> Result<Self, Error> {
        let username = string_field(&secret, "username")?;
        let password = string_field(&secret, "password")?;

        let seconds = i64::try_from(secret.lease_duration).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(seconds)
            .and_then(|d| issued_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok(Self { username, password: SecretString::from(password), expires_at })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the lease can still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

fn string_field(secret: &BrokerSecret, field: &str) -> Result<String, Error> {
    match secret.data.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(Error::Credential(format!("{field} in broker secret is not a string"))),
        None => Err(Error::Credential(format!("{field} not in broker secret"))),
    }
}
