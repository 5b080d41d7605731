use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rolling release channels of the Flutter repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Master,
    Dev,
    Beta,
    Stable,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Master, Channel::Dev, Channel::Beta, Channel::Stable];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Dev => "dev",
            Self::Beta => "beta",
            Self::Stable => "stable",
        }
    }

    #[must_use]
    pub fn is_channel(name: &str) -> bool {
        name.parse::<Channel>().is_ok()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown channel: {input}")]
pub struct ChannelParseError {
    pub input: String,
}

impl FromStr for Channel {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match only: "Stable" is not a channel.
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| ChannelParseError {
                input: s.to_string(),
            })
    }
}

/// One SDK copy known to the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    pub number: String,
    pub active: bool,
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Version {
    /// An installed copy backed by a completed workspace directory.
    #[must_use]
    pub fn installed(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            active: false,
            exists: true,
            installed_at: None,
        }
    }

    /// A version that is known by name only. Never active, never numbered.
    #[must_use]
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_channel(&self) -> bool {
        Channel::is_channel(&self.name)
    }

    #[must_use]
    pub fn has_number(&self) -> bool {
        !self.number.is_empty()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.number.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.number)
        }
    }
}
