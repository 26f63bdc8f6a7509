//! Messages exchanged between the coordinator and the workers.

use serde::{Deserialize, Serialize};

use crate::{
    cache::CacheKey,
    error::{RangecrackError, RangecrackResult},
    hash::HashFunction,
    Digest, MAX_PASSWORD_LENGTH_ALLOWED,
};

pub const ENDPOINT_CRACK: &str = "/crack";
pub const ENDPOINT_HEALTH: &str = "/health";

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// A crack request as received on the wire.
/// Every field is optional so that a malformed request can be told apart
/// from a request that fails to parse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrackRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u64>,
}

impl CrackRequest {
    /// Creates a request over the whole search space.
    pub fn full(hashed_password: impl Into<String>, max_length: u8) -> Self {
        Self {
            hashed_password: Some(hashed_password.into()),
            max_length: Some(max_length as u64),
            start_index: None,
            end_index: None,
        }
    }

    /// Creates a request over the counters `start..=end`.
    pub fn range(hashed_password: impl Into<String>, max_length: u8, start: u64, end: u64) -> Self {
        Self {
            start_index: Some(start),
            end_index: Some(end),
            ..Self::full(hashed_password, max_length)
        }
    }

    /// Checks the request and turns it into a job for the given hash function.
    pub fn validate(&self, hash: HashFunction) -> RangecrackResult<CrackJob> {
        let hashed_password = match self.hashed_password.as_deref() {
            Some(hashed_password) if !hashed_password.is_empty() => hashed_password,
            _ => {
                return Err(RangecrackError::InvalidInput(
                    "hashed_password is missing".to_owned(),
                ))
            }
        };
        let target = hash.parse_digest(hashed_password)?;

        let max_length = self
            .max_length
            .ok_or_else(|| RangecrackError::InvalidInput("max_length is missing".to_owned()))?;
        if !(1..=MAX_PASSWORD_LENGTH_ALLOWED as u64).contains(&max_length) {
            return Err(RangecrackError::InvalidInput(format!(
                "max_length should be between 1 and {MAX_PASSWORD_LENGTH_ALLOWED}"
            )));
        }

        // a single bound is ignored and the whole space is searched
        let range = match (self.start_index, self.end_index) {
            (Some(start), Some(end)) if end < start => {
                return Err(RangecrackError::InvalidInput(
                    "end_index should not be lower than start_index".to_owned(),
                ))
            }
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };

        Ok(CrackJob {
            hashed_password: hashed_password.to_owned(),
            target,
            max_length: max_length as u8,
            range,
        })
    }
}

/// A validated crack request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrackJob {
    /// The digest as sent by the client, echoed in the response.
    pub hashed_password: String,
    /// The decoded digest.
    pub target: Digest,
    pub max_length: u8,
    /// The inclusive range of counters to search, `None` for the whole space.
    pub range: Option<(u64, u64)>,
}

impl CrackJob {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            digest: self.hashed_password.to_ascii_lowercase(),
            max_length: self.max_length,
            range: self.range,
        }
    }
}

/// The result of a crack request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CrackResponse {
    Success {
        cleartext_password: String,
        hashed_password: String,
    },
    Failed {
        message: String,
        hashed_password: String,
    },
}

impl CrackResponse {
    pub fn not_found(job: &CrackJob) -> Self {
        let message = match job.range {
            Some((start, end)) => format!(
                "Password not found in range {start}-{end} up to length {}",
                job.max_length
            ),
            None => format!("Password not found up to length {}", job.max_length),
        };

        Self::Failed {
            message,
            hashed_password: job.hashed_password.clone(),
        }
    }

    /// Replaces the echoed digest, keeping the outcome.
    pub fn with_hashed_password(self, hashed_password: &str) -> Self {
        match self {
            Self::Success {
                cleartext_password, ..
            } => Self::Success {
                cleartext_password,
                hashed_password: hashed_password.to_owned(),
            },
            Self::Failed { message, .. } => Self::Failed {
                message,
                hashed_password: hashed_password.to_owned(),
            },
        }
    }

    /// Returns the cleartext password if the request succeeded.
    pub fn cleartext(&self) -> Option<&str> {
        match self {
            Self::Success {
                cleartext_password, ..
            } => Some(cleartext_password),
            Self::Failed { .. } => None,
        }
    }
}

/// Returned instead of a `CrackResponse` when the request could not be handled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn invalid_input() -> Self {
        Self {
            error: INVALID_INPUT_MESSAGE.to_owned(),
        }
    }

    pub fn internal() -> Self {
        Self {
            error: INTERNAL_ERROR_MESSAGE.to_owned(),
        }
    }
}
