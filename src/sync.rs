//! Reconciles catalog, favorites and the open session into render
//! instructions for whatever draws the page.

use rand::Rng;

use crate::state::catalog::Catalog;
use crate::state::data::RecipeSummary;
use crate::state::prefs::{FavoriteSet, ThemePreference};
use crate::state::session::DetailSession;

/// Shown when the random picker has nothing to choose from
pub const NO_VISIBLE_RECIPES: &str = "No recipes visible to choose from.";

/// Search box and category dropdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    pub category: Option<String>,
}

impl Filter {
    /// Category must match exactly; the query is a case-insensitive
    /// substring of the name or the ingredient text.
    pub fn matches(&self, recipe: &RecipeSummary) -> bool {
        let category_match = match self.category.as_deref() {
            None | Some("") => true,
            Some(category) => recipe.category == category,
        };
        let query = self.query.trim().to_lowercase();
        let text_match = query.is_empty()
            || recipe.name.to_lowercase().contains(&query)
            || recipe.ingredients.search_text().to_lowercase().contains(&query);
        category_match && text_match
    }
}

/// One card in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    pub id: String,
    pub visible: bool,
    pub favorite: bool,
}

/// Image area of the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Image(String),
    Placeholder,
}

/// Everything the detail view displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub ingredients: Vec<String>,
    pub counter: String,
    pub step_text: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub image: ImageSlot,
    pub favorite: bool,
}

/// What the rendering layer is asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderInstruction {
    ShowCard { id: String, visible: bool },
    SetCardFavorite { id: String, active: bool },
    ShowDetail(DetailView),
    CloseDetail,
    ApplyTheme(ThemePreference),
    Notify(String),
}

/// Visibility and favorite state of every card, in catalog order
pub fn card_states(catalog: &Catalog, favorites: &FavoriteSet, filter: &Filter) -> Vec<CardState> {
    catalog
        .iter()
        .map(|recipe| CardState {
            id: recipe.name.clone(),
            visible: filter.matches(recipe),
            favorite: favorites.contains(&recipe.name),
        })
        .collect()
}

/// Full grid render: visibility and favorite icon of every card
pub fn render_grid(catalog: &Catalog, favorites: &FavoriteSet, filter: &Filter) -> Vec<RenderInstruction> {
    card_states(catalog, favorites, filter)
        .into_iter()
        .flat_map(|card| {
            [
                RenderInstruction::ShowCard {
                    id: card.id.clone(),
                    visible: card.visible,
                },
                RenderInstruction::SetCardFavorite {
                    id: card.id,
                    active: card.favorite,
                },
            ]
        })
        .collect()
}

/// Visibility instructions for the whole grid
pub fn render_visibility(catalog: &Catalog, filter: &Filter) -> Vec<RenderInstruction> {
    catalog
        .iter()
        .map(|recipe| RenderInstruction::ShowCard {
            id: recipe.name.clone(),
            visible: filter.matches(recipe),
        })
        .collect()
}

/// Favorite icon instructions for the whole grid
pub fn render_favorites(catalog: &Catalog, favorites: &FavoriteSet) -> Vec<RenderInstruction> {
    catalog
        .iter()
        .map(|recipe| RenderInstruction::SetCardFavorite {
            id: recipe.name.clone(),
            active: favorites.contains(&recipe.name),
        })
        .collect()
}

pub fn detail_view(session: &DetailSession, recipe: &RecipeSummary, favorites: &FavoriteSet) -> DetailView {
    DetailView {
        title: recipe.name.clone(),
        ingredients: recipe.ingredient_list(),
        counter: session.counter(),
        step_text: session.step_text(),
        previous_enabled: session.can_go_previous(),
        next_enabled: session.can_go_next(),
        image: match session.image() {
            Some(image) => ImageSlot::Image(image.to_string()),
            None => ImageSlot::Placeholder,
        },
        favorite: favorites.contains(session.recipe_id()),
    }
}

/// Pick one visible recipe uniformly at random
pub fn pick_random<'a, R: Rng>(
    catalog: &'a Catalog,
    filter: &Filter,
    rng: &mut R,
) -> Option<&'a RecipeSummary> {
    let visible: Vec<&RecipeSummary> = catalog.iter().filter(|recipe| filter.matches(recipe)).collect();
    if visible.is_empty() {
        return None;
    }
    Some(visible[rng.random_range(0..visible.len())])
}
