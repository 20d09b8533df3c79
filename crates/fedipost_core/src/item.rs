use serde::Deserialize;

/// A published piece of content eligible for announcement.
///
/// `id` is the stable identifier recorded in the ledger; in practice it is the
/// item's site-relative URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub site_url: String,
    pub path: String,
    /// Comma-separated tags that are always announced with this item.
    #[serde(default)]
    pub tag_override: Option<String>,
    /// Tags assigned by the content pipeline.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// Item whose identifier and path are both `path`, as produced for static sites.
    pub fn new(
        site_url: impl Into<String>,
        path: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Self {
            id: path.clone(),
            title: title.into(),
            summary: summary.into(),
            site_url: site_url.into(),
            path,
            tag_override: None,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tag_override(mut self, tags: impl Into<String>) -> Self {
        self.tag_override = Some(tags.into());
        self
    }

    /// Base URL and path joined by exactly one slash.
    pub fn permalink(&self) -> String {
        let base = self.site_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
