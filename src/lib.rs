//! Wardrobe catalog: clothing items, outfits, favorites and bookmarks kept in
//! a key-value store, plus the filtered views built on top of them.

pub mod backend;
pub mod config;
pub mod db;
pub mod demo;
pub mod models;
pub mod outfit;
pub mod persistence;
pub mod projection;
pub mod storage;
pub mod upload;
pub mod wardrobe;

pub use backend::BackendError;
pub use models::{ClothingItem, IdSet, ItemView, MembershipList, OutfitItem, Theme};
pub use projection::ViewFilter;
pub use storage::{KeyValueStore, MemoryStore};
pub use wardrobe::{Notice, Notifier, Wardrobe};
