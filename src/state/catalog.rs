use std::collections::{BTreeSet, HashSet};

use super::data::{RawList, RecipeSummary};

/// The recipes shown in the card grid, in display order.
///
/// Identifiers are unique: when two recipes share a name, the first wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<RecipeSummary>,
}

impl Catalog {
    pub fn new(recipes: Vec<RecipeSummary>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            if seen.insert(recipe.name.clone()) {
                unique.push(recipe);
            } else {
                tracing::warn!(name = %recipe.name, "duplicate recipe name ignored");
            }
        }
        Self { recipes: unique }
    }

    pub fn get(&self, id: &str) -> Option<&RecipeSummary> {
        self.recipes.iter().find(|recipe| recipe.name == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeSummary> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Distinct categories, sorted, for the category filter
    pub fn categories(&self) -> Vec<String> {
        self.recipes
            .iter()
            .map(|recipe| recipe.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The recipes bundled with the app
    pub fn builtin() -> Self {
        let list = |items: &[&str]| RawList::List(items.iter().map(|s| s.to_string()).collect());
        Self::new(vec![
            RecipeSummary::new("Avocado Toast", "breakfast")
                .with_ingredients("sourdough, avocado, lemon, chili flakes, flaky salt")
                .with_steps("Toast the bread | Mash avocado with lemon and salt | Spread and top with chili flakes"),
            RecipeSummary::new("Shakshuka", "breakfast")
                .with_ingredients(list(&["eggs", "tomatoes", "red pepper", "onion", "cumin", "paprika"]))
                .with_steps(r#"["Soften onion and pepper", "Add spices and tomatoes, simmer 10 minutes", "Crack in the eggs", "Cover until the whites set"]"#),
            RecipeSummary::new("Caesar Salad", "lunch")
                .with_ingredients("romaine, parmesan, croutons, anchovy, egg yolk, garlic, olive oil")
                .with_steps(list(&["Whisk yolk, garlic and anchovy", "Stream in olive oil", "Toss romaine with dressing", "Finish with parmesan and croutons"])),
            RecipeSummary::new("Truffle Mac & Cheese", "dinner")
                .with_ingredients("macaroni, gruyere, cheddar, milk, butter, flour, truffle oil")
                .with_steps("Boil macaroni|Make a roux with butter and flour|Whisk in milk, melt the cheeses|Fold in pasta and truffle oil"),
            RecipeSummary::new("Seared Salmon", "dinner")
                .with_ingredients(list(&["salmon fillet", "butter", "thyme", "lemon"]))
                .with_steps(r#"["Pat the salmon dry", "Sear skin side down 4 minutes", "Baste with butter and thyme", "Rest and squeeze lemon"]"#),
            RecipeSummary::new("Crème Brûlée", "dessert")
                .with_ingredients("cream, egg yolks, sugar, vanilla")
                .with_steps("Infuse cream with vanilla | Temper into yolks and sugar | Bake in a water bath | Chill, then torch sugar on top"),
            RecipeSummary::new("Affogato", "dessert").with_ingredients("vanilla gelato, espresso"),
        ])
    }
}
