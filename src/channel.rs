//! Release tracks recognized by the publisher.

use crate::error::{ChannelError, Result};
use std::fmt;
use std::str::FromStr;

/// Track used when none is given on the command line
pub const DEFAULT_CHANNEL: Channel = Channel::Alpha;

/// A Play release track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Internal testing
    Internal,
    /// Closed testing
    Alpha,
    /// Open testing
    Beta,
    /// Production
    Production,
}

impl Channel {
    /// Every recognized track, in rollout order
    pub const ALL: [Channel; 4] = [
        Channel::Internal,
        Channel::Alpha,
        Channel::Beta,
        Channel::Production,
    ];

    /// Name the Play API uses for this track
    pub fn api_name(&self) -> &'static str {
        match self {
            Channel::Internal => "internal",
            Channel::Alpha => "alpha",
            Channel::Beta => "beta",
            Channel::Production => "production",
        }
    }

    /// Resolve an optional selector, falling back to [`DEFAULT_CHANNEL`].
    ///
    /// Unknown names are an error; they never fall back to the default.
    pub fn select(selector: Option<&str>) -> Result<Self> {
        match selector {
            None => Ok(DEFAULT_CHANNEL),
            Some(name) => Ok(name.parse()?),
        }
    }

    fn known_names() -> String {
        Self::ALL
            .iter()
            .map(Channel::api_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Channel {
    type Err = ChannelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.api_name() == s)
            .ok_or_else(|| ChannelError::UnknownChannel {
                name: s.to_string(),
                known: Self::known_names(),
            })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}
