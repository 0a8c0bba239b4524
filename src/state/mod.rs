/// State management module
///
/// This module handles all application state, including:
/// - Recipe cards and list normalization (data.rs)
/// - The bundled recipe catalog (catalog.rs)
/// - Key-value storage backends (storage.rs)
/// - Favorites and theme preferences (prefs.rs)
/// - The open recipe's step navigation (session.rs)

pub mod catalog;
pub mod data;
pub mod prefs;
pub mod session;
pub mod storage;
