//! Group and workspace-state records, including their wire encoding.
//!
//! The persisted JSON shape is fixed: `color` is `"#RRGGBB"`, `shortcut` is
//! an empty string when absent, and booleans use the original camelCase
//! field names. Blobs written by earlier versions of the record load
//! unchanged.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A 24-bit RGB color, wire form `"#RRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must look like #RRGGBB, got {0:?}")]
    Malformed(String),
}

impl Color {
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// Default color offered for a freshly created group.
    #[must_use]
    pub const fn default_group_color() -> Self {
        Self::from_rgb(0x77, 0xFF, 0x77)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::Malformed(value.to_owned()))?;
        if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(ColorParseError::Malformed(value.to_owned()));
        }
        let packed = u32::from_str_radix(hex, 16)
            .map_err(|_| ColorParseError::Malformed(value.to_owned()))?;
        Ok(Self(packed))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// A single alphanumeric shortcut key, stored lowercase and matched
/// case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut(char);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortcutParseError {
    #[error("shortcut must be a single alphanumeric character, got {0:?}")]
    Invalid(String),
}

impl Shortcut {
    pub fn new(key: char) -> Result<Self, ShortcutParseError> {
        if key.is_ascii_alphanumeric() {
            Ok(Self(key.to_ascii_lowercase()))
        } else {
            Err(ShortcutParseError::Invalid(key.to_string()))
        }
    }

    #[must_use]
    pub const fn key(self) -> char {
        self.0
    }

    #[must_use]
    pub fn matches(self, key: char) -> bool {
        self.0 == key.to_ascii_lowercase()
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => Self::new(key),
            _ => Err(ShortcutParseError::Invalid(value.to_owned())),
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-defined tag set over the host's channel list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub color: Color,
    /// Opaque channel ids; ids for channels that no longer exist are
    /// harmless and simply never match.
    pub channels: Vec<String>,
    #[serde(with = "shortcut_wire")]
    pub shortcut: Option<Shortcut>,
    pub is_selected: bool,
}

impl Group {
    /// A blank group as offered by the create form.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            color: Color::default_group_color(),
            channels: Vec::new(),
            shortcut: None,
            is_selected: false,
        }
    }

    #[must_use]
    pub fn contains_channel(&self, channel_id: &str) -> bool {
        self.channels.iter().any(|id| id == channel_id)
    }
}

/// The unit of persistence: one record per workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    pub groups: Vec<Group>,
    pub mute_unselected_channels: bool,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            mute_unselected_channels: true,
        }
    }
}

/// The original record stores an absent shortcut as `""`.
mod shortcut_wire {
    use super::Shortcut;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Shortcut>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(shortcut) => serializer.collect_str(shortcut),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Shortcut>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(D::Error::custom)
    }
}
