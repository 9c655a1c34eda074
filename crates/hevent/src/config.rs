//! Emitter configuration.
//!
//! # Environment Variables
//!
//! - `HEVENT_CONTRACT_POLICY`: `panic` (default) or `reject`
//! - `HEVENT_EMITTER_LABEL`: label attached to emitter log records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EventError, Result};

/// Environment variable selecting the contract-violation policy.
pub const CONTRACT_POLICY_ENV: &str = "HEVENT_CONTRACT_POLICY";

/// Environment variable for the emitter label.
pub const EMITTER_LABEL_ENV: &str = "HEVENT_EMITTER_LABEL";

/// What an emitter does when asked to emit a family it never declared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractPolicy {
    /// Treat it as a programming error and panic.
    #[default]
    Panic,
    /// Log a warning, count it, and report the event as unhandled.
    Reject,
}

impl fmt::Display for ContractPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractPolicy::Panic => write!(f, "panic"),
            ContractPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for ContractPolicy {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" => Ok(ContractPolicy::Panic),
            "reject" => Ok(ContractPolicy::Reject),
            other => Err(EventError::InvalidConfig(format!(
                "unknown contract policy: {other}"
            ))),
        }
    }
}

/// Configuration for an emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Policy applied to out-of-set emits.
    pub contract_policy: ContractPolicy,
    /// Optional label included in log records.
    pub label: Option<String>,
}

impl EmitterConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from the `HEVENT_*` environment variables.
    ///
    /// Unset variables fall back to defaults; an unrecognized policy is an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(policy) = std::env::var(CONTRACT_POLICY_ENV) {
            config.contract_policy = policy.parse()?;
        }
        if let Ok(label) = std::env::var(EMITTER_LABEL_ENV) {
            if !label.is_empty() {
                config.label = Some(label);
            }
        }

        Ok(config)
    }

    /// Sets the contract-violation policy.
    pub fn with_contract_policy(mut self, policy: ContractPolicy) -> Self {
        self.contract_policy = policy;
        self
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
