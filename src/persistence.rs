//! Load/save pairs for the persisted collections.
//!
//! Loads are fail-open: a missing key, an unreadable store, or malformed
//! JSON all produce the empty collection. Saves report failures as a
//! [`StorageFault`] value after logging them; they never abort the caller.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{ClothingItem, IdSet, OutfitItem, Theme};
use crate::storage::KeyValueStore;

pub const WARDROBE_ITEMS_KEY: &str = "wardrobe-items";
pub const OUTFITS_KEY: &str = "outfits";
pub const FAVORITES_KEY: &str = "favorites";
pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const THEME_KEY: &str = "theme-mode";

#[derive(Debug, Error)]
pub enum StorageFault {
    #[error("failed to read '{key}': {source:#}")]
    Read {
        key: &'static str,
        source: anyhow::Error,
    },
    #[error("stored '{key}' is malformed: {source}")]
    Malformed {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to write '{key}': {source:#}")]
    Write {
        key: &'static str,
        source: anyhow::Error,
    },
}

impl StorageFault {
    pub fn key(&self) -> &'static str {
        match self {
            StorageFault::Read { key, .. }
            | StorageFault::Malformed { key, .. }
            | StorageFault::Encode { key, .. }
            | StorageFault::Write { key, .. } => key,
        }
    }
}

fn try_load<T, S>(store: &S, key: &'static str) -> Result<Option<T>, StorageFault>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store
        .read(key)
        .map_err(|source| StorageFault::Read { key, source })?
    else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageFault::Malformed { key, source })
}

fn load_or_default<T, S>(store: &S, key: &'static str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    match try_load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(fault) => {
            tracing::error!(key, "{fault}; using an empty collection");
            T::default()
        }
    }
}

fn save_json<T, S>(store: &mut S, key: &'static str, value: &T) -> Result<(), StorageFault>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(|source| StorageFault::Encode { key, source })
        .and_then(|json| {
            store
                .write(key, &json)
                .map_err(|source| StorageFault::Write { key, source })
        });
    match &result {
        Ok(()) => tracing::debug!(key, "saved collection"),
        Err(fault) => tracing::error!(key, "{fault}"),
    }
    result
}

pub fn load_wardrobe_items<S: KeyValueStore + ?Sized>(store: &S) -> Vec<ClothingItem> {
    load_or_default(store, WARDROBE_ITEMS_KEY)
}

pub fn save_wardrobe_items<S: KeyValueStore + ?Sized>(
    store: &mut S,
    items: &[ClothingItem],
) -> Result<(), StorageFault> {
    save_json(store, WARDROBE_ITEMS_KEY, items)
}

pub fn load_outfits<S: KeyValueStore + ?Sized>(store: &S) -> Vec<OutfitItem> {
    load_or_default(store, OUTFITS_KEY)
}

pub fn save_outfits<S: KeyValueStore + ?Sized>(
    store: &mut S,
    outfits: &[OutfitItem],
) -> Result<(), StorageFault> {
    save_json(store, OUTFITS_KEY, outfits)
}

pub fn load_favorites<S: KeyValueStore + ?Sized>(store: &S) -> IdSet {
    load_or_default(store, FAVORITES_KEY)
}

pub fn save_favorites<S: KeyValueStore + ?Sized>(
    store: &mut S,
    ids: &IdSet,
) -> Result<(), StorageFault> {
    save_json(store, FAVORITES_KEY, ids)
}

pub fn load_bookmarks<S: KeyValueStore + ?Sized>(store: &S) -> IdSet {
    load_or_default(store, BOOKMARKS_KEY)
}

pub fn save_bookmarks<S: KeyValueStore + ?Sized>(
    store: &mut S,
    ids: &IdSet,
) -> Result<(), StorageFault> {
    save_json(store, BOOKMARKS_KEY, ids)
}

/// Theme preference is a bare string, not JSON. Unknown values read as unset.
pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Option<Theme> {
    match store.read(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().ok(),
        Ok(None) => None,
        Err(source) => {
            let fault = StorageFault::Read {
                key: THEME_KEY,
                source,
            };
            tracing::error!(key = THEME_KEY, "{fault}");
            None
        }
    }
}

pub fn save_theme<S: KeyValueStore + ?Sized>(
    store: &mut S,
    theme: Theme,
) -> Result<(), StorageFault> {
    store
        .write(THEME_KEY, theme.as_str())
        .map_err(|source| StorageFault::Write {
            key: THEME_KEY,
            source,
        })
        .inspect_err(|fault| tracing::error!(key = THEME_KEY, "{fault}"))
}
