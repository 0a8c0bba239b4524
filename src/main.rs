use iced::keyboard::{self, key::Named, Key};
use iced::widget::{button, column, container, pick_list, row, text, text_input, Column};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use recipe_book::state::catalog::Catalog;
use recipe_book::state::prefs::{PreferenceStore, ThemePreference};
use recipe_book::state::storage::SqliteStorage;
use recipe_book::{Command, Config, RecipeBook, StoreError};

// Declare the ui module
mod ui;

use ui::page::Page;

/// How often to look for favorites written by another instance
const STORAGE_POLL: Duration = Duration::from_millis(500);

/// Entry of the category dropdown
#[derive(Debug, Clone, PartialEq, Eq)]
enum CategoryChoice {
    All,
    Only(String),
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryChoice::All => f.write_str("All categories"),
            CategoryChoice::Only(category) => f.write_str(category),
        }
    }
}

/// Main application state
struct RecipeBookApp {
    /// Controller owning catalog, preferences and the open recipe
    book: RecipeBook<SqliteStorage, StdRng>,
    /// What is currently drawn
    page: Page,
    categories: Vec<CategoryChoice>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Open(String),
    ToggleFavorite(String),
    DetailFavorite,
    Next,
    Previous,
    ShowAll,
    Dismiss,
    QueryChanged(String),
    CategorySelected(CategoryChoice),
    Random,
    ToggleTheme,
    DismissNotice,
    /// Periodic check for writes from another instance
    StorageTick,
}

impl RecipeBookApp {
    /// Create a new instance of the application
    fn new(config: Config, storage: SqliteStorage) -> (Self, Task<Message>) {
        let mut prefs = PreferenceStore::with_keys(storage, config.favorites_key, config.theme_key);
        prefs.on_external_change(|| tracing::info!("preferences changed by another instance"));

        let catalog = Catalog::builtin();
        let mut categories = vec![CategoryChoice::All];
        categories.extend(catalog.categories().into_iter().map(CategoryChoice::Only));

        let mut page = Page::new(&catalog);
        let mut book = RecipeBook::new(catalog, prefs, StdRng::from_os_rng());
        page.apply(book.handle(Command::Init));

        (
            RecipeBookApp {
                book,
                page,
                categories,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let command = match message {
            Message::StorageTick => {
                let instructions = self.book.sync_external();
                self.page.apply(instructions);
                return Task::none();
            }
            Message::DismissNotice => {
                self.page.clear_notice();
                return Task::none();
            }
            Message::Open(id) => Command::OpenRecipe(id),
            Message::ToggleFavorite(id) => Command::ToggleFavorite(id),
            Message::DetailFavorite => Command::ToggleDetailFavorite,
            Message::Next => Command::StepNext,
            Message::Previous => Command::StepPrevious,
            Message::ShowAll => Command::ShowAllSteps,
            Message::Dismiss => Command::DismissDetail,
            Message::QueryChanged(query) => Command::SetQuery(query),
            Message::CategorySelected(CategoryChoice::All) => Command::SetCategory(None),
            Message::CategorySelected(CategoryChoice::Only(category)) => Command::SetCategory(Some(category)),
            Message::Random => Command::PickRandom,
            Message::ToggleTheme => Command::ToggleTheme,
        };

        self.page.clear_notice();
        let instructions = self.book.handle(command);
        self.page.apply(instructions);
        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if let Some(detail) = &self.page.detail {
            return ui::detail::view(detail);
        }

        let selected = match &self.book.filter().category {
            Some(category) => CategoryChoice::Only(category.clone()),
            None => CategoryChoice::All,
        };

        let theme_label = match self.page.theme {
            ThemePreference::Light => "Dark mode",
            ThemePreference::Dark => "Light mode",
        };

        let toolbar = row![
            text_input("Search recipes or ingredients...", &self.book.filter().query)
                .on_input(Message::QueryChanged)
                .padding(8)
                .width(Length::Fill),
            pick_list(self.categories.clone(), Some(selected), Message::CategorySelected),
            button("Random").on_press(Message::Random),
            button(theme_label).on_press(Message::ToggleTheme),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let mut content: Column<Message> = column![text("Recipe Book").size(40), toolbar]
            .spacing(20)
            .padding(30);

        if let Some(notice) = &self.page.notice {
            content = content.push(
                row![
                    text(notice).width(Length::Fill),
                    button("OK").on_press(Message::DismissNotice),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
        }

        content = content.push(ui::grid::view(&self.page));

        container(iced::widget::scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let poll = iced::time::every(STORAGE_POLL).map(|_| Message::StorageTick);
        if self.page.detail.is_some() {
            Subscription::batch([poll, keyboard::on_key_press(detail_key)])
        } else {
            poll
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.page.theme {
            ThemePreference::Light => Theme::Light,
            ThemePreference::Dark => Theme::Dark,
        }
    }
}

/// Arrow keys step through the open recipe, Escape closes it
fn detail_key(key: Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(Named::ArrowLeft) => Some(Message::Previous),
        Key::Named(Named::ArrowRight) => Some(Message::Next),
        Key::Named(Named::Escape) => Some(Message::Dismiss),
        _ => None,
    }
}

/// Open the on-disk store, falling back to a private in-memory one
fn open_storage(config: &Config) -> Result<SqliteStorage, StoreError> {
    match SqliteStorage::open(&config.db_path) {
        Ok(storage) => Ok(storage),
        Err(e) => {
            tracing::error!(error = %e, path = %config.db_path.display(), "cannot open preference store, preferences will not persist");
            SqliteStorage::in_memory()
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    let storage = match open_storage(&config) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!(error = %e, "cannot create a preference store");
            std::process::exit(1);
        }
    };

    iced::application("Recipe Book", RecipeBookApp::update, RecipeBookApp::view)
        .theme(RecipeBookApp::theme)
        .subscription(RecipeBookApp::subscription)
        .centered()
        .run_with(move || RecipeBookApp::new(config, storage))
}
