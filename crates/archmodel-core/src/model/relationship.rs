use serde::{Deserialize, Serialize};

use super::tags;

/// How the source talks to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionStyle {
    Synchronous,
    Asynchronous,
}

impl InteractionStyle {
    pub fn tag(&self) -> &'static str {
        match self {
            InteractionStyle::Synchronous => tags::SYNCHRONOUS,
            InteractionStyle::Asynchronous => tags::ASYNCHRONOUS,
        }
    }
}

/// A directed, labelled edge between two elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source_id: String,
    pub destination_id: String,
    /// May be empty
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_style: Option<InteractionStyle>,
    /// User tags in insertion order
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Set on implied relationships: the relationship they were derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_from: Option<String>,
}

impl Relationship {
    pub fn new(
        id: String,
        source_id: String,
        destination_id: String,
        description: String,
    ) -> Self {
        Self {
            id,
            source_id,
            destination_id,
            description,
            technology: None,
            interaction_style: None,
            tags: Vec::new(),
            url: None,
            implied_from: None,
        }
    }

    /// "Relationship", then the interaction style tag, then user tags
    pub fn tags(&self) -> Vec<String> {
        let mut all = vec![tags::RELATIONSHIP.to_string()];
        if let Some(style) = self.interaction_style {
            all.push(style.tag().to_string());
        }
        for tag in &self.tags {
            if !all.contains(tag) {
                all.push(tag.clone());
            }
        }
        all
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    /// Add user tags; blanks and duplicates are ignored
    pub fn add_tags(&mut self, new_tags: &[&str]) {
        for tag in new_tags {
            let tag = tag.trim();
            if tag.is_empty() || self.has_tag(tag) {
                continue;
            }
            self.tags.push(tag.to_string());
        }
    }

    pub fn is_implied(&self) -> bool {
        self.implied_from.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_include_interaction_style() {
        let mut r = Relationship::new("1".into(), "a".into(), "b".into(), "Uses".into());
        r.interaction_style = Some(InteractionStyle::Asynchronous);
        r.add_tags(&["Tag 1", "Tag 1", " "]);

        assert_eq!(r.tags(), vec!["Relationship", "Asynchronous", "Tag 1"]);
    }
}
