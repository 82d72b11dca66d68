//! Space separated tag strings.
//!
//! Checks store their tags as one delimited string. Everything in here works
//! on an ordered, deduplicated [`TagSet`] and only converts back to the
//! delimited form when the result is handed to persistence.

use std::fmt;

pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_TAGS_PER_CHECK: usize = 20;
pub const MAX_TAGS_FIELD_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("invalid tag")]
    InvalidTag,
    #[error("too many tags")]
    TooManyTags,
    #[error("tags field is too long")]
    TagsFieldTooLong,
}

/// Tags in first-occurrence order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn parse(raw: &str) -> Self {
        let mut set = TagSet::default();
        set.extend(raw.split_whitespace());
        set
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tags
    }

    /// Appends `tag` unless it is already present.
    pub fn insert(&mut self, tag: &str) -> bool {
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Inserts every whitespace separated token of every item, keeping the given order.
    /// Returns how many tags were new.
    pub fn extend<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for item in items {
            for token in item.as_ref().split_whitespace() {
                if self.insert(token) {
                    added += 1;
                }
            }
        }
        added
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        before != self.tags.len()
    }

    /// Length of the single-space joined form.
    pub fn serialized_len(&self) -> usize {
        let chars: usize = self.tags.iter().map(|t| t.chars().count()).sum();
        chars + self.tags.len().saturating_sub(1)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tags.join(" "))
    }
}

pub fn clean_tags(raw: &str) -> Vec<String> {
    TagSet::parse(raw).into_vec()
}

/// A single tag token as it arrives from a URL segment.
pub fn validate_tag(tag: &str) -> Result<(), TagError> {
    if tag.is_empty() || tag.chars().count() > MAX_TAG_LENGTH {
        return Err(TagError::InvalidTag);
    }
    if tag
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '%')
    {
        return Err(TagError::InvalidTag);
    }
    Ok(())
}

/// Returns the new raw string, or `None` when `tag` is already present.
/// The limits are checked against the normalized form before anything is returned.
pub fn add_tag(raw: &str, tag: &str) -> Result<Option<String>, TagError> {
    validate_tag(tag)?;

    let mut set = TagSet::parse(raw);
    if !set.insert(tag) {
        return Ok(None);
    }
    check_limits(&set)?;

    let existing = raw.trim_end();
    if existing.trim_start().is_empty() {
        Ok(Some(tag.to_string()))
    } else {
        Ok(Some(format!("{existing} {tag}")))
    }
}

/// Returns the re-joined string, or `None` when `tag` is absent.
pub fn remove_tag(raw: &str, tag: &str) -> Option<String> {
    let mut set = TagSet::parse(raw);
    if set.remove(tag) {
        Some(set.to_string())
    } else {
        None
    }
}

fn check_limits(set: &TagSet) -> Result<(), TagError> {
    if set.len() > MAX_TAGS_PER_CHECK {
        return Err(TagError::TooManyTags);
    }
    if set.serialized_len() > MAX_TAGS_FIELD_LENGTH {
        return Err(TagError::TagsFieldTooLong);
    }
    Ok(())
}

/// Every token must be a valid tag. The limits apply only when something new
/// was added, so re-adding present tags never fails.
pub fn bulk_tags_add<I, S>(raw: &str, tags: I) -> Result<String, TagError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = TagSet::parse(raw);
    let mut tokens = Vec::new();
    for item in tags {
        for token in item.as_ref().split_whitespace() {
            validate_tag(token)?;
            tokens.push(token.to_string());
        }
    }
    if set.extend(tokens) > 0 {
        check_limits(&set)?;
    }
    Ok(set.to_string())
}

pub fn bulk_tags_remove<I, S>(raw: &str, tags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = TagSet::parse(raw);
    for item in tags {
        for token in item.as_ref().split_whitespace() {
            set.remove(token);
        }
    }
    set.to_string()
}
