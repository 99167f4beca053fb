use serde::Serialize;
use std::fmt;

use crate::error::{EditorialError, Result};

pub const MAX_TOPIC_CHARS: usize = 200;

/// A validated, trimmed article topic of 1 to 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic(String);

impl Topic {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EditorialError::InvalidTopic("Topic cannot be empty.".to_string()));
        }

        let length = trimmed.chars().count();
        if length > MAX_TOPIC_CHARS {
            return Err(EditorialError::InvalidTopic(format!(
                "Topic is {} characters long, the limit is {}.",
                length, MAX_TOPIC_CHARS
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
