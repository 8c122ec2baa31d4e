use std::cmp::Reverse;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single feed entry. Field names follow the store's JSON (camelCase).
/// `id` and the timestamps are assigned by the store, so a draft built
/// client-side carries none of them.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Post {
    // Millisecond sort key. Missing or unparseable timestamps order as
    // the oldest posts.
    pub fn created_key(&self) -> i64 {
        parse_timestamp(self.created_at.as_deref()).unwrap_or(i64::MIN)
    }

    /// True once the store has regenerated `updatedAt` after an update.
    pub fn is_edited(&self) -> bool {
        match (&self.created_at, &self.updated_at) {
            (Some(created), Some(updated)) => created != updated,
            _ => false,
        }
    }

    /// Local-time header timestamp: the update time for edited posts,
    /// the creation time otherwise.
    pub fn display_time(&self) -> String {
        let raw = if self.is_edited() {
            self.updated_at.as_deref()
        } else {
            self.created_at.as_deref()
        };

        match raw.and_then(|ts| DateTime::parse_from_rfc3339(ts).ok()) {
            Some(dt) => DateTime::<Local>::from(dt).format("%H:%M %h-%d-%Y").to_string(),
            None => String::from("unknown time"),
        }
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<i64> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_key(|post| Reverse(post.created_key()));
}
