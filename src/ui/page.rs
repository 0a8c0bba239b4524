use recipe_book::state::catalog::Catalog;
use recipe_book::state::prefs::ThemePreference;
use recipe_book::sync::{DetailView, RenderInstruction};

/// One card as currently drawn
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub category: String,
    pub ingredients: String,
    pub visible: bool,
    pub favorite: bool,
}

/// What is on screen. Only changes through [`Page::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub cards: Vec<CardView>,
    pub detail: Option<DetailView>,
    pub theme: ThemePreference,
    pub notice: Option<String>,
}

impl Page {
    pub fn new(catalog: &Catalog) -> Self {
        let cards = catalog
            .iter()
            .map(|recipe| CardView {
                id: recipe.name.clone(),
                category: recipe.category.clone(),
                ingredients: recipe.ingredient_list().join(", "),
                visible: true,
                favorite: false,
            })
            .collect();
        Self {
            cards,
            detail: None,
            theme: ThemePreference::default(),
            notice: None,
        }
    }

    pub fn apply(&mut self, instructions: Vec<RenderInstruction>) {
        for instruction in instructions {
            match instruction {
                RenderInstruction::ShowCard { id, visible } => {
                    if let Some(card) = self.card_mut(&id) {
                        card.visible = visible;
                    }
                }
                RenderInstruction::SetCardFavorite { id, active } => {
                    if let Some(card) = self.card_mut(&id) {
                        card.favorite = active;
                    }
                }
                RenderInstruction::ShowDetail(view) => self.detail = Some(view),
                RenderInstruction::CloseDetail => self.detail = None,
                RenderInstruction::ApplyTheme(theme) => self.theme = theme,
                RenderInstruction::Notify(message) => self.notice = Some(message),
            }
        }
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &CardView> {
        self.cards.iter().filter(|card| card.visible)
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn card_mut(&mut self, id: &str) -> Option<&mut CardView> {
        self.cards.iter_mut().find(|card| card.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_book::state::data::RecipeSummary;
    use recipe_book::sync::ImageSlot;

    fn page() -> Page {
        Page::new(&Catalog::new(vec![
            RecipeSummary::new("Pasta", "dinner").with_ingredients("spaghetti,  salt"),
            RecipeSummary::new("Salad", "lunch"),
        ]))
    }

    #[test]
    fn test_card_instructions() {
        let mut page = page();
        assert_eq!(page.cards[0].ingredients, "spaghetti, salt");
        page.apply(vec![
            RenderInstruction::ShowCard { id: "Salad".into(), visible: false },
            RenderInstruction::SetCardFavorite { id: "Pasta".into(), active: true },
            RenderInstruction::SetCardFavorite { id: "Ghost".into(), active: true },
        ]);
        let visible: Vec<_> = page.visible_cards().map(|card| card.id.as_str()).collect();
        assert_eq!(visible, vec!["Pasta"]);
        assert!(page.cards[0].favorite);
    }

    #[test]
    fn test_detail_theme_and_notice() {
        let mut page = page();
        let view = DetailView {
            title: "Pasta".into(),
            ingredients: vec![],
            counter: "Step 1 of 1".into(),
            step_text: "Boil".into(),
            previous_enabled: false,
            next_enabled: false,
            image: ImageSlot::Placeholder,
            favorite: false,
        };
        page.apply(vec![
            RenderInstruction::ShowDetail(view.clone()),
            RenderInstruction::ApplyTheme(ThemePreference::Dark),
            RenderInstruction::Notify("hello".into()),
        ]);
        assert_eq!(page.detail, Some(view));
        assert_eq!(page.theme, ThemePreference::Dark);
        assert_eq!(page.notice.as_deref(), Some("hello"));

        page.apply(vec![RenderInstruction::CloseDetail]);
        page.clear_notice();
        assert!(page.detail.is_none());
        assert!(page.notice.is_none());
    }
}
