//! Map raw trigger payloads to domain events.
//!
//! The trigger names records by logical entity name and carries their fields in
//! an attribute bag; only the content attribute is read.

use crate::domain::{ContentEvent, EntityKind};
use crate::shared::config::{
    AppConfig, DEFAULT_CONTENT_FIELD, DEFAULT_POST_ENTITY, DEFAULT_REPLY_ENTITY,
};
use serde::Deserialize;
use std::collections::HashMap;

/// One inbound message as received from the trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    /// Logical entity name, e.g. `ats_post`.
    pub entity: String,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

/// Logical names that identify posts and replies, and the content attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityNames {
    pub post: String,
    pub reply: String,
    pub content_field: String,
}

impl Default for EntityNames {
    fn default() -> Self {
        Self {
            post: DEFAULT_POST_ENTITY.to_string(),
            reply: DEFAULT_REPLY_ENTITY.to_string(),
            content_field: DEFAULT_CONTENT_FIELD.to_string(),
        }
    }
}

impl EntityNames {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            post: cfg.post_entity_or_default(),
            reply: cfg.reply_entity_or_default(),
            content_field: cfg.content_field_or_default(),
        }
    }

    pub fn kind_of(&self, logical_name: &str) -> EntityKind {
        if logical_name == self.post {
            EntityKind::Post
        } else if logical_name == self.reply {
            EntityKind::Reply
        } else {
            EntityKind::Other
        }
    }
}

/// Map a raw event. Missing or non-text content becomes empty content.
pub fn raw_to_domain(raw: &RawEvent, names: &EntityNames) -> ContentEvent {
    let content = raw
        .attributes
        .get(&names.content_field)
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    ContentEvent::new(names.kind_of(&raw.entity), content)
}
