//! Fedipost core: ledger diffing, message composition and the pure dispatch cycle.
mod compose;
mod effect;
mod item;
mod ledger;
mod msg;
mod settings;
mod state;
mod tags;
mod update;

pub use compose::{compose, MarkupStripper, MessageParts, PlainText};
pub use effect::Effect;
pub use item::Item;
pub use ledger::Ledger;
pub use msg::Msg;
pub use settings::{ComposeSettings, TagPolicy, Visibility, DEFAULT_MAX_LENGTH, DEFAULT_READ_MORE};
pub use state::{CycleFailure, CycleReport, CycleState, Phase};
pub use tags::{collect_tags, hashtag, tag_string};
pub use update::update;
