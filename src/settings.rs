//! User preferences kept in the key-value store.

use crate::db::KeyValueStore;
use crate::logger;
use crate::models::Theme;

pub const THEME_KEY: &str = "theme";

/// Stored theme, or dark when absent or unrecognised.
pub fn load_theme(store: &dyn KeyValueStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            logger::log(&format!("Failed to read theme preference: {}", e));
            Theme::default()
        }
    }
}

pub fn save_theme(store: &mut dyn KeyValueStore, theme: Theme) {
    if let Err(e) = store.set(THEME_KEY, theme.as_str()) {
        logger::log(&format!("Failed to save theme preference: {}", e));
    }
}

/// Flip the theme and persist the new value.
pub fn toggle_theme(store: &mut dyn KeyValueStore, theme: Theme) -> Theme {
    let next = theme.toggled();
    save_theme(store, next);
    next
}
