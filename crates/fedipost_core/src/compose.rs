use crate::tags::{collect_tags, tag_string};
use crate::{ComposeSettings, Item};

/// Characters reserved for the `" ..."` marker when the summary is cut.
const ELLIPSIS_RESERVE: usize = 4;
const ELLIPSIS: &str = " ...\n";

/// Turns possibly marked-up text into plain text.
pub trait MarkupStripper: Send + Sync {
    fn strip(&self, text: &str) -> String;
}

/// Stripper for input that carries no markup: only trims.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl MarkupStripper for PlainText {
    fn strip(&self, text: &str) -> String {
        text.trim().to_string()
    }
}

/// The four layout segments of a message, before and after truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageParts {
    pub title: String,
    pub summary: String,
    pub read_more: String,
    pub tags: String,
}

impl MessageParts {
    pub fn build(item: &Item, settings: &ComposeSettings, stripper: &dyn MarkupStripper) -> Self {
        let title = format!("{}\n\n", stripper.strip(&item.title).trim());
        let summary = format!("{}\n", stripper.strip(&item.summary).trim());
        let read_more = format!("{}{}\n\n", settings.read_more, item.permalink());
        let tags = tag_string(&collect_tags(item, settings));
        Self {
            title,
            summary,
            read_more,
            tags,
        }
    }

    /// Length in characters of the assembled message.
    pub fn len(&self) -> usize {
        char_len(&self.title)
            + char_len(&self.summary)
            + char_len(&self.read_more)
            + char_len(&self.tags)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cuts the summary so the message fits `max_length`.
    ///
    /// Only the summary shrinks. When title, link and tags alone leave no room
    /// the summary keeps no content, only the marker.
    pub fn fit(mut self, max_length: usize) -> Self {
        if self.len() <= max_length {
            return self;
        }
        let fixed = char_len(&self.title) + char_len(&self.tags) + char_len(&self.read_more);
        let keep = max_length
            .saturating_sub(fixed)
            .saturating_sub(ELLIPSIS_RESERVE);
        let mut summary: String = self.summary.chars().take(keep).collect();
        summary.push_str(ELLIPSIS);
        self.summary = summary;
        self
    }

    pub fn assemble(&self) -> String {
        let mut message = String::with_capacity(
            self.title.len() + self.summary.len() + self.read_more.len() + self.tags.len(),
        );
        message.push_str(&self.title);
        message.push_str(&self.summary);
        message.push_str(&self.read_more);
        message.push_str(&self.tags);
        message
    }
}

/// Composes the announcement for `item`.
///
/// Layout is `title`, blank line, `summary`, newline, read-more link, blank
/// line, tags. Deterministic for a deterministic stripper.
pub fn compose(item: &Item, settings: &ComposeSettings, stripper: &dyn MarkupStripper) -> String {
    MessageParts::build(item, settings, stripper)
        .fit(settings.max_length)
        .assemble()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_leaves_short_messages_alone() {
        let parts = MessageParts {
            title: "T\n\n".into(),
            summary: "S\n".into(),
            read_more: "R\n\n".into(),
            tags: String::new(),
        };
        assert_eq!(parts.clone().fit(100), parts);
    }

    #[test]
    fn fit_saturates_when_fixed_parts_overflow() {
        let parts = MessageParts {
            title: "a long title\n\n".into(),
            summary: "summary\n".into(),
            read_more: "R\n\n".into(),
            tags: "#x".into(),
        };
        assert_eq!(parts.fit(5).summary, " ...\n");
    }
}
