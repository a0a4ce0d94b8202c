//! Session data as it is persisted on the client

use crate::error::StoreResult;
use crate::store::{StoreKey, TokenStore};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A complete, validated session triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry of the access token, kept verbatim as the server sent it
    pub expires_at: String,
}

impl TokenSet {
    /// Build a token set, rejecting empty fields
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: impl Into<String>,
    ) -> Option<Self> {
        let set = Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: expires_at.into(),
        };
        if set.access_token.is_empty() || set.refresh_token.is_empty() || set.expires_at.is_empty()
        {
            return None;
        }
        Some(set)
    }

    /// Write all three fields to the store
    ///
    /// The writes are independent; a failure part way leaves the earlier
    /// fields updated.
    pub fn persist<S: TokenStore + ?Sized>(&self, store: &S) -> StoreResult<()> {
        store.set(StoreKey::AccessToken, &self.access_token)?;
        store.set(StoreKey::ExpiresAt, &self.expires_at)?;
        store.set(StoreKey::RefreshToken, &self.refresh_token)?;
        Ok(())
    }
}

/// Whatever is currently in the store, field by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<String>,
}

impl StoredSession {
    /// True when all three fields are present
    pub fn is_complete(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some() && self.expires_at.is_some()
    }

    /// True when nothing at all is stored
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.expires_at.is_none()
    }

    /// Whether the stored access token has expired at `now`
    ///
    /// Returns `None` when no expiry is stored.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> Option<bool> {
        self.expires_at.as_deref().map(|raw| is_expired(raw, now))
    }

    /// Convert into a token set if complete
    pub fn into_token_set(self) -> Option<TokenSet> {
        TokenSet::new(self.access_token?, self.refresh_token?, self.expires_at?)
    }
}

/// Parse an `expiresAt` value
///
/// Accepts RFC 3339, a date-time without offset (read in the local time zone,
/// which is what the authentication service emits) and a bare date (UTC
/// midnight).
pub fn parse_expires_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether an expiry lies strictly before `now`
///
/// An unparsable expiry counts as expired so the caller refreshes instead of
/// trusting a token of unknown lifetime.
pub fn is_expired(raw: &str, now: DateTime<Utc>) -> bool {
    parse_expires_at(raw).is_none_or(|expires_at| now > expires_at)
}
