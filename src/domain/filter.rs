// Search and tag filters applied before pagination
use serde::Serialize;

/// Tag key matched by the categorical filter.
pub const TYPE_TAG: &str = "type";

/// Items that expose string tags to the categorical filter.
pub trait Tagged {
    fn tag(&self, key: &str) -> Option<&str>;
}

/// Free-text and type predicates. Blank predicates are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataFilter {
    pub search: Option<String>,
    pub tag_type: Option<String>,
}

impl DataFilter {
    pub fn new(search: Option<String>, tag_type: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.trim().is_empty()),
            tag_type: tag_type.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.tag_type.is_none()
    }

    pub fn matches<T: Serialize + Tagged>(&self, item: &T) -> bool {
        self.matches_search(item) && self.matches_type(item)
    }

    fn matches_search<T: Serialize>(&self, item: &T) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        match serde_json::to_string(item) {
            Ok(serialized) => serialized.to_lowercase().contains(&term.to_lowercase()),
            Err(e) => {
                tracing::warn!("Could not serialize item for search: {}", e);
                false
            }
        }
    }

    fn matches_type<T: Tagged>(&self, item: &T) -> bool {
        match &self.tag_type {
            Some(wanted) => item.tag(TYPE_TAG) == Some(wanted.as_str()),
            None => true,
        }
    }

    /// Keeps the items matching every present predicate, preserving order.
    pub fn apply<T: Serialize + Tagged>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_empty() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}
