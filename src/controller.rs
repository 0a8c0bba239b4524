//! The single top-level controller: receives UI commands, updates state,
//! and answers with render instructions.

use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;

use crate::error::NavigationError;
use crate::state::catalog::Catalog;
use crate::state::prefs::{toggle_favorite, FavoriteSet, PreferenceStore, ThemePreference};
use crate::state::session::DetailSession;
use crate::state::storage::Storage;
use crate::sync::{self, Filter, RenderInstruction, NO_VISIBLE_RECIPES};

/// User and host events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// First render: theme and the whole card grid
    Init,
    OpenRecipe(String),
    /// Star button on a card
    ToggleFavorite(String),
    /// Star button in the detail view
    ToggleDetailFavorite,
    StepNext,
    StepPrevious,
    GoToStep(isize),
    ShowAllSteps,
    DismissDetail,
    SetQuery(String),
    SetCategory(Option<String>),
    PickRandom,
    ToggleTheme,
    /// Another context may have written to storage
    StorageChanged,
}

pub struct RecipeBook<S, R> {
    catalog: Catalog,
    prefs: PreferenceStore<S>,
    favorites: FavoriteSet,
    theme: ThemePreference,
    filter: Filter,
    session: Option<DetailSession>,
    rng: R,
    /// Raised by the preference listener, cleared by [`RecipeBook::sync_external`]
    external_change: Rc<Cell<bool>>,
}

impl<S: Storage, R: Rng> RecipeBook<S, R> {
    pub fn new(catalog: Catalog, mut prefs: PreferenceStore<S>, rng: R) -> Self {
        let external_change = Rc::new(Cell::new(false));
        let flag = Rc::clone(&external_change);
        prefs.on_external_change(move || flag.set(true));

        let favorites = prefs.load_favorites();
        let theme = prefs.load_theme();
        tracing::info!(recipes = catalog.len(), favorites = favorites.len(), %theme, "recipe book ready");
        Self {
            catalog,
            prefs,
            favorites,
            theme,
            filter: Filter::default(),
            session: None,
            rng,
            external_change,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn session(&self) -> Option<&DetailSession> {
        self.session.as_ref()
    }

    pub fn handle(&mut self, command: Command) -> Vec<RenderInstruction> {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::Init => {
                self.persist_theme();
                let mut out = vec![RenderInstruction::ApplyTheme(self.theme)];
                out.extend(sync::render_grid(&self.catalog, &self.favorites, &self.filter));
                out
            }
            Command::OpenRecipe(id) => self.open(&id),
            Command::ToggleFavorite(id) => self.toggle(&id),
            Command::ToggleDetailFavorite => match self.session.as_ref() {
                Some(session) => {
                    let id = session.recipe_id().to_string();
                    self.toggle(&id)
                }
                None => Vec::new(),
            },
            Command::StepNext => self.navigate(|session| session.next()),
            Command::StepPrevious => self.navigate(|session| session.previous()),
            Command::GoToStep(index) => self.navigate(|session| session.go_to(index)),
            Command::ShowAllSteps => {
                let shown = self
                    .session
                    .as_mut()
                    .is_some_and(|session| !session.all_steps_text().is_empty());
                if shown {
                    self.render_detail()
                } else {
                    Vec::new()
                }
            }
            Command::DismissDetail => {
                if self.session.take().is_some() {
                    vec![RenderInstruction::CloseDetail]
                } else {
                    Vec::new()
                }
            }
            Command::SetQuery(query) => {
                self.filter.query = query;
                sync::render_visibility(&self.catalog, &self.filter)
            }
            Command::SetCategory(category) => {
                self.filter.category = category;
                sync::render_visibility(&self.catalog, &self.filter)
            }
            Command::PickRandom => {
                let picked = sync::pick_random(&self.catalog, &self.filter, &mut self.rng).map(|recipe| recipe.name.clone());
                match picked {
                    Some(id) => self.open(&id),
                    None => vec![RenderInstruction::Notify(NO_VISIBLE_RECIPES.to_string())],
                }
            }
            Command::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.persist_theme();
                vec![RenderInstruction::ApplyTheme(self.theme)]
            }
            Command::StorageChanged => self.reload(),
        }
    }

    /// Poll storage for a foreign write; reload everything if the change
    /// listener fired
    pub fn sync_external(&mut self) -> Vec<RenderInstruction> {
        self.prefs.dispatch_external_changes();
        if self.external_change.replace(false) {
            self.handle(Command::StorageChanged)
        } else {
            Vec::new()
        }
    }

    fn open(&mut self, id: &str) -> Vec<RenderInstruction> {
        let Some(recipe) = self.catalog.get(id) else {
            tracing::warn!(id, "open requested for unknown recipe");
            return Vec::new();
        };
        tracing::debug!(id, "opening recipe");
        self.session = Some(DetailSession::open(recipe));
        self.render_detail()
    }

    fn toggle(&mut self, id: &str) -> Vec<RenderInstruction> {
        self.favorites = toggle_favorite(&self.favorites, id);
        if let Err(e) = self.prefs.save_favorites(&self.favorites) {
            tracing::warn!(error = %e, "could not save favorites");
        }
        let mut out = sync::render_favorites(&self.catalog, &self.favorites);
        out.extend(self.render_detail());
        out
    }

    fn navigate<F>(&mut self, step: F) -> Vec<RenderInstruction>
    where
        F: FnOnce(&mut DetailSession) -> Result<usize, NavigationError>,
    {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match step(session) {
            Ok(_) => self.render_detail(),
            Err(e) => {
                tracing::debug!(reason = %e, "step navigation ignored");
                Vec::new()
            }
        }
    }

    /// Full reload after another context wrote to storage
    fn reload(&mut self) -> Vec<RenderInstruction> {
        self.favorites = self.prefs.load_favorites();
        self.theme = self.prefs.load_theme();
        let mut out = vec![RenderInstruction::ApplyTheme(self.theme)];
        out.extend(sync::render_favorites(&self.catalog, &self.favorites));
        out.extend(self.render_detail());
        out
    }

    fn render_detail(&self) -> Vec<RenderInstruction> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        match self.catalog.get(session.recipe_id()) {
            Some(recipe) => vec![RenderInstruction::ShowDetail(sync::detail_view(session, recipe, &self.favorites))],
            None => Vec::new(),
        }
    }

    fn persist_theme(&mut self) {
        if let Err(e) = self.prefs.save_theme(self.theme) {
            tracing::warn!(error = %e, "could not save theme");
        }
    }
}
