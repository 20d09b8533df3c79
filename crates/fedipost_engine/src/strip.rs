use fedipost_core::MarkupStripper;
use scraper::Html;

/// HTML-to-text stripper:
/// - parses the input as an HTML fragment
/// - concatenates every text node, entities decoded
/// - trims surrounding whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlStripper;

impl MarkupStripper for HtmlStripper {
    fn strip(&self, text: &str) -> String {
        let fragment = Html::parse_fragment(text);
        fragment
            .root_element()
            .text()
            .collect::<String>()
            .trim()
            .to_string()
    }
}
