//! Recipe book core: catalog, favorites and theme persistence, and the
//! step-by-step detail session, independent of any UI toolkit.

pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod sync;

pub use config::Config;
pub use controller::{Command, RecipeBook};
pub use error::{NavigationError, StoreError};
