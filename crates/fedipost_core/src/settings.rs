use std::fmt;

use serde::Deserialize;

pub const DEFAULT_READ_MORE: &str = "Read more: ";
/// The service accepts 500 characters; the remainder is a safety gap.
pub const DEFAULT_MAX_LENGTH: usize = 490;

/// Audience of a posted status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
    #[default]
    Direct,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
            Visibility::Direct => "direct",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tag sources end up in a message.
///
/// Fixed and per-item override tags are always included; native item tags
/// only under `Both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum TagPolicy {
    None,
    Item,
    #[default]
    Both,
}

impl TagPolicy {
    pub fn includes_native(self) -> bool {
        self == TagPolicy::Both
    }
}

impl From<&str> for TagPolicy {
    /// Unrecognised values suppress native tags like `item` does.
    fn from(value: &str) -> Self {
        match value.trim() {
            "both" => TagPolicy::Both,
            "none" => TagPolicy::None,
            _ => TagPolicy::Item,
        }
    }
}

impl From<String> for TagPolicy {
    fn from(value: String) -> Self {
        TagPolicy::from(value.as_str())
    }
}

/// Inputs to message composition, read-only for the duration of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComposeSettings {
    pub read_more: String,
    pub visibility: Visibility,
    /// Comma-separated tags added to every message.
    pub fixed_tags: String,
    pub tag_policy: TagPolicy,
    pub max_length: usize,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            read_more: DEFAULT_READ_MORE.to_string(),
            visibility: Visibility::default(),
            fixed_tags: String::new(),
            tag_policy: TagPolicy::default(),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}
