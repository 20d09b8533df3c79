use crate::{ComposeSettings, Item};

/// Collects hashtag tokens for `item` in announcement order: fixed tags,
/// override tags, then native tags when the policy allows them.
pub fn collect_tags(item: &Item, settings: &ComposeSettings) -> Vec<String> {
    let mut tokens = Vec::new();
    push_comma_separated(&mut tokens, &settings.fixed_tags);
    if let Some(overrides) = item.tag_override.as_deref() {
        push_comma_separated(&mut tokens, overrides);
    }
    if settings.tag_policy.includes_native() {
        tokens.extend(item.tags.iter().filter_map(|tag| hashtag(tag)));
    }
    tokens
}

/// Joins tokens with `", "`; empty when there are none.
pub fn tag_string(tokens: &[String]) -> String {
    tokens.join(", ")
}

/// `#` plus the tag with every space removed, or `None` if nothing is left.
pub fn hashtag(tag: &str) -> Option<String> {
    let body: String = tag.chars().filter(|c| *c != ' ').collect();
    if body.is_empty() {
        None
    } else {
        Some(format!("#{body}"))
    }
}

fn push_comma_separated(tokens: &mut Vec<String>, raw: &str) {
    tokens.extend(raw.split(',').filter_map(hashtag));
}
