//! Category module - the fixed set of restaurant categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Restaurant category
///
/// The extractor lists every label in its prompt and maps anything the model
/// returns outside this set to the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Korean cuisine
    Korean,
    /// Japanese cuisine
    Japanese,
    /// Chinese cuisine
    Chinese,
    /// Western cuisine (Italian, French, American, ...)
    Western,
    /// Other Asian cuisine (Thai, Vietnamese, Indian, ...)
    Asian,
    /// Coffee shop
    Cafe,
    /// Bakery
    Bakery,
    /// Dessert shop
    Dessert,
    /// Bar or pub
    Bar,
    /// Fast food
    FastFood,
    /// Anything else
    #[default]
    Other,
}

impl Category {
    /// Every category, in prompt order
    pub const ALL: [Category; 11] = [
        Category::Korean,
        Category::Japanese,
        Category::Chinese,
        Category::Western,
        Category::Asian,
        Category::Cafe,
        Category::Bakery,
        Category::Dessert,
        Category::Bar,
        Category::FastFood,
        Category::Other,
    ];

    /// Get the category label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Korean => "korean",
            Category::Japanese => "japanese",
            Category::Chinese => "chinese",
            Category::Western => "western",
            Category::Asian => "asian",
            Category::Cafe => "cafe",
            Category::Bakery => "bakery",
            Category::Dessert => "dessert",
            Category::Bar => "bar",
            Category::FastFood => "fast_food",
            Category::Other => "other",
        }
    }

    /// Parse a category label leniently
    ///
    /// Case-insensitive, surrounding whitespace ignored, `-` and spaces are
    /// treated as `_`. Returns `None` for anything outside the enumeration.
    ///
    /// # Examples
    ///
    /// ```
    /// use matjip_domain::Category;
    ///
    /// assert_eq!(Category::parse(" Fast-Food "), Some(Category::FastFood));
    /// assert_eq!(Category::parse("steakhouse"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
    }

    /// Comma-separated list of every label, for prompts and error messages
    pub fn labels() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown category: {}", s))
    }
}
