use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::item::Item;

/// Categories offered by the item form. Stored as free text, so rows may
/// carry values outside this set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Category {
    Book,
    Movie,
    Series,
    Anime,
    Documentary,
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Book,
        Self::Movie,
        Self::Series,
        Self::Anime,
        Self::Documentary,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Movie => "Movie",
            Self::Series => "Series",
            Self::Anime => "Anime",
            Self::Documentary => "Documentary",
            Self::General => "General",
        }
    }
}

pub const DEFAULT_PRIORITY: i64 = 1;

/// Raw fields of the create and edit forms.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ItemForm {
    pub title: Option<String>,
    pub deadline: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

impl ItemForm {
    /// Builds an item from the submitted fields. The title is trimmed but not
    /// checked; see [`Item::validate`]. A present but non-numeric priority is
    /// an error.
    pub fn into_item(self, id: Option<i64>) -> Result<Item, AppError> {
        let title = self.title.unwrap_or_default().trim().to_string();
        let deadline = self.deadline.filter(|value| !value.is_empty());
        let category = self
            .category
            .unwrap_or_else(|| Category::General.as_str().to_string());
        let priority = match self.priority {
            Some(value) => value.trim().parse::<i64>()?,
            None => DEFAULT_PRIORITY,
        };

        let mut item = Item::new(title);
        item.id = id;
        item.deadline = deadline;
        item.category = category;
        item.priority = priority;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str) -> ItemForm {
        ItemForm {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn missing_fields_use_defaults() {
        let item = form("  Dune  ").into_item(None).expect("item");
        assert_eq!(item.title, "Dune");
        assert_eq!(item.deadline, None);
        assert_eq!(item.category, "General");
        assert_eq!(item.priority, 1);
        assert_eq!(item.id, None);
    }

    #[test]
    fn empty_deadline_is_absent() {
        let mut input = form("Dune");
        input.deadline = Some(String::new());
        let item = input.into_item(None).expect("item");
        assert_eq!(item.deadline, None);
    }

    #[test]
    fn submitted_fields_are_kept() {
        let input = ItemForm {
            title: Some("Arrival".to_string()),
            deadline: Some("2026-12-24".to_string()),
            category: Some("Movie".to_string()),
            priority: Some(" 4 ".to_string()),
        };
        let item = input.into_item(Some(7)).expect("item");
        assert_eq!(item.id, Some(7));
        assert_eq!(item.deadline.as_deref(), Some("2026-12-24"));
        assert_eq!(item.category, "Movie");
        assert_eq!(item.priority, 4);
    }

    #[test]
    fn malformed_priority_is_rejected() {
        let mut input = form("Dune");
        input.priority = Some("high".to_string());
        let err = input.into_item(None).expect_err("should fail");
        assert!(matches!(err, AppError::Parse(_)));

        let mut input = form("Dune");
        input.priority = Some(String::new());
        assert!(input.into_item(None).is_err());
    }

    #[test]
    fn categories_keep_form_order() {
        let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        assert_eq!(
            names,
            ["Book", "Movie", "Series", "Anime", "Documentary", "General"]
        );
    }
}
