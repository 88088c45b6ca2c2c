//! Response vocabulary of the dynupdate API
//!
//! The endpoint answers with a plaintext body whose first whitespace-delimited
//! token is the status:
//!
//! | Token      | Meaning                                               |
//! |------------|-------------------------------------------------------|
//! | `good`     | update accepted, followed by the address now recorded |
//! | `nochg`    | address already current, followed by that address    |
//! | `nohost`   | hostname does not exist on the account                |
//! | `badauth`  | invalid username/password                             |
//! | `badagent` | client disabled, usually a missing user agent         |
//! | `!donator` | feature not available for this account type           |
//! | `abuse`    | username blocked for abuse                            |
//! | `911`      | server-side problem, try again later                  |
//!
//! [`NoIpClient::update`](crate::NoIpClient::update) never interprets the
//! body. This module is for callers (and the log observer) that want to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Status token at the start of a response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// `good`
    Good,
    /// `nochg`
    NoChange,
    /// `nohost`
    NoHost,
    /// `badauth`
    BadAuth,
    /// `badagent`
    BadAgent,
    /// `!donator`
    NotDonator,
    /// `abuse`
    Abuse,
    /// `911`
    ServerError,
    /// Any token outside the documented vocabulary (empty for an empty body)
    Unknown(String),
}

impl UpdateStatus {
    /// Map a status token to its variant
    pub fn from_token(token: &str) -> Self {
        match token {
            "good" => Self::Good,
            "nochg" => Self::NoChange,
            "nohost" => Self::NoHost,
            "badauth" => Self::BadAuth,
            "badagent" => Self::BadAgent,
            "!donator" => Self::NotDonator,
            "abuse" => Self::Abuse,
            "911" => Self::ServerError,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// `true` when the registrar holds the requested address (`good`, `nochg`)
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Good | Self::NoChange)
    }

    /// `true` for statuses that repeating the same request will not fix
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoHost | Self::BadAuth | Self::BadAgent | Self::NotDonator | Self::Abuse
        )
    }

    /// The wire token for this status
    pub fn as_token(&self) -> &str {
        match self {
            Self::Good => "good",
            Self::NoChange => "nochg",
            Self::NoHost => "nohost",
            Self::BadAuth => "badauth",
            Self::BadAgent => "badagent",
            Self::NotDonator => "!donator",
            Self::Abuse => "abuse",
            Self::ServerError => "911",
            Self::Unknown(token) => token,
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A classified response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// Status from the first token
    pub status: UpdateStatus,
    /// Address following `good`/`nochg`, when it parses
    pub ip: Option<IpAddr>,
    /// The body exactly as received
    pub raw: String,
}

impl UpdateResponse {
    /// Classify a response body
    ///
    /// Never fails: unknown tokens become [`UpdateStatus::Unknown`] and an
    /// unparsable address is left as `None`. The raw body is kept verbatim.
    pub fn parse(body: &str) -> Self {
        let mut tokens = body.split_whitespace();
        let status = UpdateStatus::from_token(tokens.next().unwrap_or_default());

        let ip = if status.is_success() {
            tokens.next().and_then(|token| token.parse().ok())
        } else {
            None
        };

        Self {
            status,
            ip,
            raw: body.to_string(),
        }
    }
}
