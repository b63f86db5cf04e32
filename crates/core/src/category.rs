use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping that transactions reference.
///
/// `id` is `None` for drafts that have not been persisted yet. Titles are
/// unique at the storage layer; the same title always resolves to the same
/// catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub title: String,
}

impl Category {
    pub fn new(title: impl Into<String>) -> Self {
        Category {
            id: None,
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_category_is_a_draft() {
        let category = Category::new("Housing");
        assert_eq!(category.id, None);
        assert_eq!(category.title, "Housing");
    }
}
