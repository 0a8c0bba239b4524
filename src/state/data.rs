//! Shared data structures for the recipe catalog
//!
//! These structs represent the data model that flows between
//! the card provider and the detail view.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Delimiter used when steps arrive as a single string
pub const STEP_DELIMITER: char = '|';

/// Delimiter used when ingredients arrive as a single string
pub const INGREDIENT_DELIMITER: char = ',';

/// A list attribute as the card provider hands it over
///
/// Cards may carry either a structured list or a single string
/// (JSON array text, or a delimited string). Any other shape reads as an
/// empty list.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawList {
    List(Vec<String>),
    Text(String),
}

impl Default for RawList {
    fn default() -> Self {
        RawList::List(Vec::new())
    }
}

impl From<Vec<String>> for RawList {
    fn from(items: Vec<String>) -> Self {
        RawList::List(items)
    }
}

impl From<&str> for RawList {
    fn from(text: &str) -> Self {
        RawList::Text(text.to_string())
    }
}

impl<'de> Deserialize<'de> for RawList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(values) => RawList::List(values.into_iter().map(element_text).collect()),
            Value::String(text) => RawList::Text(text),
            Value::Null => RawList::default(),
            other => {
                tracing::warn!(value = %other, "ignoring list attribute of unexpected type");
                RawList::default()
            }
        })
    }
}

impl RawList {
    /// Normalize into a clean list of entries.
    ///
    /// Priority: structured list, then JSON array text, then a split on
    /// `delimiter`. Entries are trimmed and blank entries dropped.
    pub fn normalize(&self, delimiter: char) -> Vec<String> {
        match self {
            RawList::List(items) => clean(items.iter().map(String::as_str)),
            RawList::Text(text) => match parse_json_array(text) {
                Some(items) => clean(items.iter().map(String::as_str)),
                None => clean(text.split(delimiter)),
            },
        }
    }

    /// Flat text used for substring search
    pub fn search_text(&self) -> String {
        match self {
            RawList::List(items) => items.join(", "),
            RawList::Text(text) => text.clone(),
        }
    }
}

/// Parse `text` as a JSON array; `None` when it is not one
fn parse_json_array(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(values) => Some(values.into_iter().map(element_text).collect()),
        _ => None,
    }
}

/// Strings stay as they are, anything else becomes its JSON text
fn element_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn clean<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// One recipe card as supplied by the catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    /// Display name, also the favorites key (unique across the catalog)
    pub name: String,
    /// Category tag used by the category filter
    pub category: String,
    /// Ingredients, comma-delimited text or a list
    #[serde(default)]
    pub ingredients: RawList,
    /// Steps, a list, JSON array text, or pipe-delimited text
    #[serde(default)]
    pub steps: RawList,
    /// Optional image path or URL
    #[serde(default)]
    pub image: Option<String>,
}

impl RecipeSummary {
    /// Create a recipe with no ingredients, steps or image
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ingredients: RawList::default(),
            steps: RawList::default(),
            image: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: impl Into<RawList>) -> Self {
        self.ingredients = ingredients.into();
        self
    }

    pub fn with_steps(mut self, steps: impl Into<RawList>) -> Self {
        self.steps = steps.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Normalized step list
    pub fn step_list(&self) -> Vec<String> {
        self.steps.normalize(STEP_DELIMITER)
    }

    /// Normalized ingredient list
    pub fn ingredient_list(&self) -> Vec<String> {
        self.ingredients.normalize(INGREDIENT_DELIMITER)
    }

    /// Image reference, treating a blank string as absent
    pub fn image_ref(&self) -> Option<&str> {
        self.image.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_list_wins() {
        let raw = RawList::List(vec![" Boil water ".into(), "".into(), "Add pasta".into()]);
        assert_eq!(raw.normalize(STEP_DELIMITER), vec!["Boil water", "Add pasta"]);
    }

    #[test]
    fn test_json_text_before_delimiter() {
        let raw = RawList::from(r#"["Chop | dice", "Fry"]"#);
        assert_eq!(raw.normalize(STEP_DELIMITER), vec!["Chop | dice", "Fry"]);
    }

    #[test]
    fn test_pipe_split_fallback() {
        let raw = RawList::from("Boil water | | Add pasta|Drain ");
        assert_eq!(raw.normalize(STEP_DELIMITER), vec!["Boil water", "Add pasta", "Drain"]);
    }

    #[test]
    fn test_json_non_array_falls_back_to_split() {
        let raw = RawList::from("\"just one step\"");
        assert_eq!(raw.normalize(STEP_DELIMITER), vec!["\"just one step\""]);
    }

    #[test]
    fn test_json_non_string_elements() {
        let raw = RawList::from(r#"["Heat", 2, null]"#);
        assert_eq!(raw.normalize(STEP_DELIMITER), vec!["Heat", "2", "null"]);
    }

    #[test]
    fn test_ingredients_comma_split() {
        let recipe = RecipeSummary::new("Salad", "lunch").with_ingredients("lettuce, tomato,, feta");
        assert_eq!(recipe.ingredient_list(), vec!["lettuce", "tomato", "feta"]);
        assert_eq!(recipe.ingredients.search_text(), "lettuce, tomato,, feta");
    }

    #[test]
    fn test_empty_text_yields_no_steps() {
        let recipe = RecipeSummary::new("Toast", "breakfast").with_steps("");
        assert!(recipe.step_list().is_empty());
    }

    #[test]
    fn test_blank_image_is_absent() {
        let recipe = RecipeSummary::new("Toast", "breakfast").with_image("  ");
        assert_eq!(recipe.image_ref(), None);
    }

    #[test]
    fn test_deserialize_list_with_non_string_elements() {
        let json = r#"{"name":"Pasta","category":"dinner","steps":["Boil", 2]}"#;
        let recipe: RecipeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.step_list(), vec!["Boil", "2"]);

        let as_text = RecipeSummary::new("Pasta", "dinner").with_steps(r#"["Boil", 2]"#);
        assert_eq!(as_text.step_list(), recipe.step_list());
    }

    #[test]
    fn test_deserialize_wrong_types_as_empty() {
        for steps in ["null", "5", "true", r#"{"first":"Boil"}"#] {
            let json = format!(r#"{{"name":"Pasta","category":"dinner","ingredients":{steps},"steps":{steps}}}"#);
            let recipe: RecipeSummary = serde_json::from_str(&json).unwrap();
            assert!(recipe.step_list().is_empty(), "steps = {steps}");
            assert!(recipe.ingredient_list().is_empty(), "ingredients = {steps}");
        }
    }

    #[test]
    fn test_deserialize_mixed_representations() {
        let json = r#"{"name":"Pasta","category":"dinner","ingredients":"pasta, salt","steps":["Boil","Eat"]}"#;
        let recipe: RecipeSummary = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.ingredients, RawList::Text("pasta, salt".into()));
        assert_eq!(recipe.step_list(), vec!["Boil", "Eat"]);
        assert_eq!(recipe.image, None);
    }
}
