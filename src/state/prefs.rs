//! Favorites and theme persisted in the local key-value store.

use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use super::storage::Storage;
use crate::error::StoreError;

/// Default storage key for the favorites array
pub const FAVORITES_KEY: &str = "bougie_favorites_v1";

/// Default storage key for the theme
pub const THEME_KEY: &str = "bougie_theme_v1";

/// Recipe identifiers the user starred.
///
/// Backed by an ordered set, so the persisted array is always sorted and
/// re-serializing a loaded set reproduces it exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet(BTreeSet<String>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Parse the stored JSON array; anything unexpected yields an empty set
    fn from_stored(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(values)) => values
                .into_iter()
                .filter_map(|value| match value {
                    Value::String(id) => Some(id),
                    _ => None,
                })
                .collect(),
            _ => {
                tracing::warn!("ignoring malformed favorites in storage");
                Self::default()
            }
        }
    }

    /// Copy of this set with `id` removed if present, added otherwise
    pub fn toggled(&self, id: &str) -> Self {
        let mut next = self.clone();
        if !next.0.remove(id) {
            next.0.insert(id.to_string());
        }
        next
    }

    fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

impl FromIterator<String> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Flip `id` in `favorites`. The caller persists the result.
pub fn toggle_favorite(favorites: &FavoriteSet, id: &str) -> FavoriteSet {
    favorites.toggled(id)
}

/// Light or dark appearance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Only the literal `dark` selects the dark theme
    pub fn parse(raw: &str) -> Self {
        if raw == "dark" {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned by [`PreferenceStore::on_external_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Favorites and theme on top of a [`Storage`] context
pub struct PreferenceStore<S> {
    storage: S,
    favorites_key: String,
    theme_key: String,
    listeners: Vec<(ListenerId, Box<dyn FnMut()>)>,
    next_listener: u64,
}

impl<S: Storage> PreferenceStore<S> {
    /// Use the default versioned keys
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, FAVORITES_KEY, THEME_KEY)
    }

    pub fn with_keys(storage: S, favorites_key: impl Into<String>, theme_key: impl Into<String>) -> Self {
        Self {
            storage,
            favorites_key: favorites_key.into(),
            theme_key: theme_key.into(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Read the favorites. Missing or malformed data gives an empty set.
    pub fn load_favorites(&self) -> FavoriteSet {
        match self.storage.get(&self.favorites_key) {
            Ok(Some(raw)) => FavoriteSet::from_stored(&raw),
            Ok(None) => FavoriteSet::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read favorites");
                FavoriteSet::default()
            }
        }
    }

    /// Persist the favorites as a JSON array
    pub fn save_favorites(&mut self, favorites: &FavoriteSet) -> Result<(), StoreError> {
        let raw = favorites.to_stored()?;
        self.storage.set(&self.favorites_key, &raw)
    }

    /// Read the theme, defaulting to light
    pub fn load_theme(&self) -> ThemePreference {
        match self.storage.get(&self.theme_key) {
            Ok(Some(raw)) => ThemePreference::parse(&raw),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read theme");
                ThemePreference::default()
            }
        }
    }

    pub fn save_theme(&mut self, theme: ThemePreference) -> Result<(), StoreError> {
        self.storage.set(&self.theme_key, theme.as_str())
    }

    /// Call `callback` whenever another context changes the store.
    ///
    /// The callback gets no payload; re-read with [`Self::load_favorites`]
    /// and [`Self::load_theme`].
    pub fn on_external_change(&mut self, callback: impl FnMut() + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Deliver a pending foreign change to the listeners.
    ///
    /// Returns whether a foreign change was seen.
    pub fn dispatch_external_changes(&mut self) -> bool {
        let changed = match self.storage.take_external_change() {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "could not poll storage for changes");
                false
            }
        };
        if changed {
            tracing::debug!(listeners = self.listeners.len(), "storage changed in another context");
            for (_, callback) in &mut self.listeners {
                callback();
            }
        }
        changed
    }
}

impl<S> fmt::Debug for PreferenceStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("favorites_key", &self.favorites_key)
            .field("theme_key", &self.theme_key)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::storage::MemoryStorage;
    use std::cell::Cell;
    use std::rc::Rc;

    fn stored(store: &MemoryStorage, key: &str) -> Option<String> {
        store.context().get(key).unwrap()
    }

    #[test]
    fn test_missing_favorites_is_empty() {
        let prefs = PreferenceStore::new(MemoryStorage::new().context());
        assert!(prefs.load_favorites().is_empty());
    }

    #[test]
    fn test_malformed_favorites_is_empty() {
        let store = MemoryStorage::new();
        let mut ctx = store.context();
        ctx.set(FAVORITES_KEY, "{not json").unwrap();
        let prefs = PreferenceStore::new(ctx);
        assert!(prefs.load_favorites().is_empty());
    }

    #[test]
    fn test_wrong_types_are_dropped() {
        let store = MemoryStorage::new();
        let mut ctx = store.context();
        ctx.set(FAVORITES_KEY, r#"["Pasta", 3, null, "Salad"]"#).unwrap();
        let prefs = PreferenceStore::new(ctx);
        let favorites = prefs.load_favorites();
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec!["Pasta", "Salad"]);

        let mut ctx = store.context();
        ctx.set(FAVORITES_KEY, r#"{"Pasta": true}"#).unwrap();
        assert!(PreferenceStore::new(ctx).load_favorites().is_empty());
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let store = MemoryStorage::new();
        let mut prefs = PreferenceStore::new(store.context());
        let original: FavoriteSet = vec!["Salad".to_string(), "Curry".to_string()].into_iter().collect();
        prefs.save_favorites(&original).unwrap();
        let before = stored(&store, FAVORITES_KEY);

        let once = toggle_favorite(&original, "Pasta");
        assert!(once.contains("Pasta"));
        let twice = toggle_favorite(&once, "Pasta");
        prefs.save_favorites(&twice).unwrap();

        assert_eq!(twice, original);
        assert_eq!(stored(&store, FAVORITES_KEY), before);
    }

    #[test]
    fn test_resave_is_stable() {
        let store = MemoryStorage::new();
        let mut ctx = store.context();
        ctx.set(FAVORITES_KEY, r#"["b","a","c"]"#).unwrap();
        let mut prefs = PreferenceStore::new(ctx);

        let favorites = prefs.load_favorites();
        prefs.save_favorites(&favorites).unwrap();
        let first = stored(&store, FAVORITES_KEY);
        let favorites = prefs.load_favorites();
        prefs.save_favorites(&favorites).unwrap();

        assert_eq!(first.as_deref(), Some(r#"["a","b","c"]"#));
        assert_eq!(stored(&store, FAVORITES_KEY), first);
    }

    #[test]
    fn test_theme_defaults_to_light() {
        let store = MemoryStorage::new();
        let mut ctx = store.context();
        assert_eq!(PreferenceStore::new(store.context()).load_theme(), ThemePreference::Light);

        ctx.set(THEME_KEY, "").unwrap();
        assert_eq!(PreferenceStore::new(store.context()).load_theme(), ThemePreference::Light);

        ctx.set(THEME_KEY, "DARK").unwrap();
        assert_eq!(PreferenceStore::new(store.context()).load_theme(), ThemePreference::Light);
    }

    #[test]
    fn test_theme_roundtrip() {
        let mut prefs = PreferenceStore::new(MemoryStorage::new().context());
        prefs.save_theme(ThemePreference::Dark).unwrap();
        assert_eq!(prefs.load_theme(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
    }

    #[test]
    fn test_external_change_reaches_other_context_only() {
        let store = MemoryStorage::new();
        let mut tab_a = PreferenceStore::new(store.context());
        let mut tab_b = PreferenceStore::new(store.context());

        let fired_a = Rc::new(Cell::new(0));
        let fired_b = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired_a);
        tab_a.on_external_change(move || counter.set(counter.get() + 1));
        let counter = Rc::clone(&fired_b);
        tab_b.on_external_change(move || counter.set(counter.get() + 1));

        let toggled = toggle_favorite(&tab_a.load_favorites(), "Pasta");
        tab_a.save_favorites(&toggled).unwrap();

        assert!(!tab_a.dispatch_external_changes());
        assert!(tab_b.dispatch_external_changes());
        assert_eq!(fired_a.get(), 0);
        assert_eq!(fired_b.get(), 1);
        assert!(tab_b.load_favorites().contains("Pasta"));
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let store = MemoryStorage::new();
        let mut writer = PreferenceStore::new(store.context());
        let mut reader = PreferenceStore::new(store.context());

        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let id = reader.on_external_change(move || flag.set(true));
        assert!(reader.remove_listener(id));
        assert!(!reader.remove_listener(id));

        writer.save_theme(ThemePreference::Dark).unwrap();
        assert!(reader.dispatch_external_changes());
        assert!(!fired.get());
    }
}
