use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// One entry of a blog feed, normalized for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct Post {
    /// When the entry was published, in the offset the feed used
    #[builder(default, setter(strip_option))]
    pub publish_date: Option<DateTime<FixedOffset>>,
    #[builder(default, setter(into))]
    pub author: String,
    #[builder(default, setter(into))]
    pub title: String,
    #[builder(default, setter(into))]
    pub description: String,
    /// A full html document, see [`wrap_content`]
    #[builder(default, setter(into))]
    pub content: String,
}

impl Post {
    pub fn local_publish_date(&self) -> Option<DateTime<Local>> {
        self.publish_date.map(|date| date.with_timezone(&Local))
    }
}

/// Wrap an entry's encoded html in a minimal document with the
/// reader's font applied.
pub fn wrap_content(encoded: &str) -> String {
    format!("<html><body style='font-family:tahoma;'>{encoded}</body></html>")
}
