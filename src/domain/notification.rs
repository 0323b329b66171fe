//! The tag notification email. Fixed plain-text template, no localization.

pub const TAGGED_SUBJECT: &str = "You were tagged in a post/reply";

/// Subject and body sent to every tagged user of one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// The body quotes the full content, unmodified.
    pub fn tagged(content: &str) -> Self {
        Self {
            subject: TAGGED_SUBJECT.to_string(),
            body: format!("{}: {}", TAGGED_SUBJECT, content),
        }
    }
}
