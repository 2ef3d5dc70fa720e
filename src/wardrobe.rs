use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};

use crate::backend::{BackendError, validate_item, validate_outfit};
use crate::models::{ClothingItem, IdSet, ItemView, MembershipList, OutfitItem, Theme, dedupe_tags};
use crate::persistence::{self, StorageFault};
use crate::projection::{self, Overlays, ViewFilter};
use crate::storage::KeyValueStore;

/// Supplies ids for entities added without one.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Outcome events for the presentation layer. Delivery is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ItemAdded { id: String },
    ItemUpdated { id: String },
    ItemDeleted { id: String },
    OutfitAdded { id: String },
    OutfitUpdated { id: String },
    OutfitDeleted { id: String },
    MembershipChanged {
        list: MembershipList,
        id: String,
        present: bool,
    },
    ThemeChanged(Theme),
    Rejected { reason: String },
    PersistFailed { key: &'static str, reason: String },
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Default sink: notices only reach the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Rejected { .. } | Notice::PersistFailed { .. } => {
                tracing::warn!(?notice, "wardrobe notice")
            }
            _ => tracing::debug!(?notice, "wardrobe notice"),
        }
    }
}

/// Authoritative in-memory copy of the persisted collections.
///
/// Every mutation rewrites the affected collection in the backing store
/// before returning. A failed write leaves the in-memory change in place
/// and is reported through the [`Notifier`] as [`Notice::PersistFailed`].
pub struct Wardrobe<S: KeyValueStore> {
    store: S,
    items: Vec<ClothingItem>,
    outfits: Vec<OutfitItem>,
    favorites: IdSet,
    bookmarks: IdSet,
    theme: Option<Theme>,
    inspiration: Vec<ClothingItem>,
    ids: Box<dyn IdGenerator>,
    notifier: Box<dyn Notifier>,
    revision: u64,
    overlay_revision: u64,
    inspiration_revision: u64,
}

impl<S: KeyValueStore> Wardrobe<S> {
    /// Loads all collections from `store` once.
    pub fn open(store: S) -> Self {
        let items = persistence::load_wardrobe_items(&store);
        let outfits = persistence::load_outfits(&store);
        let favorites = persistence::load_favorites(&store);
        let bookmarks = persistence::load_bookmarks(&store);
        let theme = persistence::load_theme(&store);
        tracing::info!(
            items = items.len(),
            outfits = outfits.len(),
            favorites = favorites.len(),
            bookmarks = bookmarks.len(),
            "wardrobe loaded"
        );
        let mut wardrobe = Self {
            store,
            items,
            outfits,
            favorites,
            bookmarks,
            theme,
            inspiration: Vec::new(),
            ids: Box::new(UuidGenerator),
            notifier: Box::new(LogNotifier),
            revision: 0,
            overlay_revision: 0,
            inspiration_revision: 0,
        };
        wardrobe.repair_loaded_ids();
        wardrobe
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn outfits(&self) -> &[OutfitItem] {
        &self.outfits
    }

    pub fn outfit(&self, id: &str) -> Option<&OutfitItem> {
        self.outfits.iter().find(|outfit| outfit.id == id)
    }

    pub fn favorites(&self) -> &IdSet {
        &self.favorites
    }

    pub fn bookmarks(&self) -> &IdSet {
        &self.bookmarks
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.contains(id)
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn inspiration(&self) -> &[ClothingItem] {
        &self.inspiration
    }

    /// Replaces the read-only inspiration feed. Not persisted.
    pub fn set_inspiration(&mut self, items: Vec<ClothingItem>) {
        self.inspiration = items;
        self.inspiration_revision += 1;
    }

    /// Bumped whenever the inspiration feed is replaced.
    pub fn inspiration_revision(&self) -> u64 {
        self.inspiration_revision
    }

    /// Bumped whenever the wardrobe item list changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bumped whenever favorites or bookmarks change.
    pub fn overlay_revision(&self) -> u64 {
        self.overlay_revision
    }

    pub fn overlays(&self) -> Overlays<'_> {
        Overlays {
            favorites: &self.favorites,
            bookmarks: &self.bookmarks,
        }
    }

    pub fn view(&self, filter: &ViewFilter) -> Vec<ItemView> {
        projection::project(&self.items, filter, self.overlays())
    }

    pub fn inspiration_view(&self, filter: &ViewFilter) -> Vec<ItemView> {
        projection::project(&self.inspiration, filter, self.overlays())
    }

    pub fn categories(&self) -> Vec<String> {
        projection::categories(&self.items)
    }

    pub fn add_item(&mut self, mut item: ClothingItem) -> Result<ClothingItem, BackendError> {
        if let Err(err) = validate_item(&item) {
            return self.reject(err);
        }
        item.id = item.id.trim().to_string();
        if item.id.is_empty() {
            item.id = self.fresh_id(|id, wardrobe| wardrobe.item(id).is_some());
        } else if self.item(&item.id).is_some() {
            return self.reject(BackendError::Validation(format!(
                "item id '{}' already exists",
                item.id
            )));
        }
        item.tags = dedupe_tags(item.tags);

        self.items.push(item.clone());
        self.revision += 1;
        tracing::info!(id = %item.id, category = %item.category, "added wardrobe item");
        self.persist_items();
        self.notify(Notice::ItemAdded {
            id: item.id.clone(),
        });
        Ok(item)
    }

    pub fn update_item(&mut self, item: ClothingItem) -> Result<ClothingItem, BackendError> {
        if let Err(err) = validate_item(&item) {
            return self.reject(err);
        }
        let Some(index) = self.items.iter().position(|existing| existing.id == item.id) else {
            return self.reject(BackendError::NotFound(format!(
                "wardrobe item '{}'",
                item.id
            )));
        };
        self.items[index] = item.clone();
        self.revision += 1;
        tracing::info!(id = %item.id, "updated wardrobe item");
        self.persist_items();
        self.notify(Notice::ItemUpdated {
            id: item.id.clone(),
        });
        Ok(item)
    }

    /// Removes the item and drops its id from favorites and bookmarks.
    pub fn delete_item(&mut self, id: &str) -> Result<ClothingItem, BackendError> {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return self.reject(BackendError::NotFound(format!("wardrobe item '{id}'")));
        };
        let removed = self.items.remove(index);
        self.revision += 1;
        tracing::info!(id, "deleted wardrobe item");
        self.persist_items();

        if self.favorites.remove(id) {
            self.overlay_revision += 1;
            self.persist_membership(MembershipList::Favorites);
        }
        if self.bookmarks.remove(id) {
            self.overlay_revision += 1;
            self.persist_membership(MembershipList::Bookmarks);
        }

        self.notify(Notice::ItemDeleted { id: id.to_string() });
        Ok(removed)
    }

    pub fn add_outfit(&mut self, mut outfit: OutfitItem) -> Result<OutfitItem, BackendError> {
        if let Err(err) = validate_outfit(&outfit) {
            return self.reject(err);
        }
        outfit.id = outfit.id.trim().to_string();
        if outfit.id.is_empty() {
            outfit.id = self.fresh_id(|id, wardrobe| wardrobe.outfit(id).is_some());
        } else if self.outfit(&outfit.id).is_some() {
            return self.reject(BackendError::Validation(format!(
                "outfit id '{}' already exists",
                outfit.id
            )));
        }
        if outfit.created_at.trim().is_empty() {
            outfit.created_at = now_iso8601();
        }

        self.outfits.push(outfit.clone());
        tracing::info!(id = %outfit.id, items = outfit.items.len(), "added outfit");
        self.persist_outfits();
        self.notify(Notice::OutfitAdded {
            id: outfit.id.clone(),
        });
        Ok(outfit)
    }

    /// Replaces an outfit in place. The stored creation time is kept.
    pub fn update_outfit(&mut self, mut outfit: OutfitItem) -> Result<OutfitItem, BackendError> {
        if let Err(err) = validate_outfit(&outfit) {
            return self.reject(err);
        }
        let Some(index) = self
            .outfits
            .iter()
            .position(|existing| existing.id == outfit.id)
        else {
            return self.reject(BackendError::NotFound(format!("outfit '{}'", outfit.id)));
        };
        outfit.created_at = self.outfits[index].created_at.clone();
        self.outfits[index] = outfit.clone();
        tracing::info!(id = %outfit.id, "updated outfit");
        self.persist_outfits();
        self.notify(Notice::OutfitUpdated {
            id: outfit.id.clone(),
        });
        Ok(outfit)
    }

    pub fn delete_outfit(&mut self, id: &str) -> Result<OutfitItem, BackendError> {
        let Some(index) = self.outfits.iter().position(|outfit| outfit.id == id) else {
            return self.reject(BackendError::NotFound(format!("outfit '{id}'")));
        };
        let removed = self.outfits.remove(index);
        tracing::info!(id, "deleted outfit");
        self.persist_outfits();
        self.notify(Notice::OutfitDeleted { id: id.to_string() });
        Ok(removed)
    }

    /// Adds or removes `id` from a membership list and persists that list.
    pub fn set_membership(
        &mut self,
        list: MembershipList,
        id: &str,
        present: bool,
    ) -> Result<(), BackendError> {
        let id = id.trim();
        if id.is_empty() {
            return self.reject(BackendError::Validation(
                "item id must not be empty".to_string(),
            ));
        }
        let set = match list {
            MembershipList::Favorites => &mut self.favorites,
            MembershipList::Bookmarks => &mut self.bookmarks,
        };
        let changed = if present {
            set.insert(id)
        } else {
            set.remove(id)
        };
        if changed {
            self.overlay_revision += 1;
        }
        tracing::debug!(%list, id, present, changed, "membership set");
        self.persist_membership(list);
        self.notify(Notice::MembershipChanged {
            list,
            id: id.to_string(),
            present,
        });
        Ok(())
    }

    pub fn set_favorite(&mut self, id: &str, present: bool) -> Result<(), BackendError> {
        self.set_membership(MembershipList::Favorites, id, present)
    }

    pub fn set_bookmark(&mut self, id: &str, present: bool) -> Result<(), BackendError> {
        self.set_membership(MembershipList::Bookmarks, id, present)
    }

    /// Flips favorite status and returns the new state.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, BackendError> {
        let present = !self.is_favorite(id.trim());
        self.set_favorite(id, present)?;
        Ok(present)
    }

    pub fn toggle_bookmark(&mut self, id: &str) -> Result<bool, BackendError> {
        let present = !self.is_bookmarked(id.trim());
        self.set_bookmark(id, present)?;
        Ok(present)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
        if let Err(fault) = persistence::save_theme(&mut self.store, theme) {
            self.report_fault(fault);
        }
        self.notify(Notice::ThemeChanged(theme));
    }

    fn fresh_id(&mut self, taken: impl Fn(&str, &Self) -> bool) -> String {
        loop {
            let id = self.ids.next_id();
            if !id.is_empty() && !taken(&id, self) {
                return id;
            }
            tracing::warn!(%id, "generated id collided, drawing another");
        }
    }

    /// Stored documents may carry blank or repeated ids. Those records get a
    /// fresh id and the repaired collection is written back.
    fn repair_loaded_ids(&mut self) {
        let mut seen = HashSet::new();
        let mut repaired = 0;
        for index in 0..self.items.len() {
            let id = self.items[index].id.trim().to_string();
            let id = if id.is_empty() || seen.contains(&id) {
                repaired += 1;
                self.fresh_id(|candidate, wardrobe| {
                    wardrobe.item(candidate).is_some()
                })
            } else {
                id
            };
            seen.insert(id.clone());
            self.items[index].id = id;
        }
        if repaired > 0 {
            tracing::warn!(repaired, "assigned fresh ids to stored wardrobe items");
            self.persist_items();
        }

        seen.clear();
        repaired = 0;
        for index in 0..self.outfits.len() {
            let id = self.outfits[index].id.trim().to_string();
            let id = if id.is_empty() || seen.contains(&id) {
                repaired += 1;
                self.fresh_id(|candidate, wardrobe| {
                    wardrobe.outfit(candidate).is_some()
                })
            } else {
                id
            };
            seen.insert(id.clone());
            self.outfits[index].id = id;
        }
        if repaired > 0 {
            tracing::warn!(repaired, "assigned fresh ids to stored outfits");
            self.persist_outfits();
        }
    }

    fn persist_items(&mut self) {
        if let Err(fault) = persistence::save_wardrobe_items(&mut self.store, &self.items) {
            self.report_fault(fault);
        }
    }

    fn persist_outfits(&mut self) {
        if let Err(fault) = persistence::save_outfits(&mut self.store, &self.outfits) {
            self.report_fault(fault);
        }
    }

    fn persist_membership(&mut self, list: MembershipList) {
        let result = match list {
            MembershipList::Favorites => {
                persistence::save_favorites(&mut self.store, &self.favorites)
            }
            MembershipList::Bookmarks => {
                persistence::save_bookmarks(&mut self.store, &self.bookmarks)
            }
        };
        if let Err(fault) = result {
            self.report_fault(fault);
        }
    }

    fn report_fault(&self, fault: StorageFault) {
        self.notify(Notice::PersistFailed {
            key: fault.key(),
            reason: fault.to_string(),
        });
    }

    fn reject<T>(&self, err: BackendError) -> Result<T, BackendError> {
        tracing::debug!("rejected: {err}");
        self.notify(Notice::Rejected {
            reason: err.to_string(),
        });
        Err(err)
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::persistence::{BOOKMARKS_KEY, FAVORITES_KEY, OUTFITS_KEY, WARDROBE_ITEMS_KEY};
    use crate::projection::ProjectionCache;
    use crate::storage::MemoryStore;

    struct Sequential(u32);

    impl IdGenerator for Sequential {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id-{}", self.0)
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Notice>>>);

    impl Notifier for Recorder {
        fn notify(&self, notice: Notice) {
            self.0.borrow_mut().push(notice);
        }
    }

    fn wardrobe() -> Wardrobe<MemoryStore> {
        Wardrobe::open(MemoryStore::new()).with_id_generator(Sequential(0))
    }

    fn tee() -> ClothingItem {
        ClothingItem::new("data:image/png;base64,AAAA", "Tops")
    }

    #[test]
    fn add_assigns_id_and_dedupes_tags() {
        let mut wardrobe = wardrobe();
        let stored = wardrobe
            .add_item(tee().with_tags(["summer", "casual", "summer"]))
            .unwrap();
        assert_eq!(stored.id, "id-1");
        assert_eq!(stored.tags, vec!["summer", "casual"]);
        assert_eq!(wardrobe.items(), &[stored]);
        assert_eq!(wardrobe.revision(), 1);
    }

    #[test]
    fn add_with_existing_id_is_rejected() {
        let mut wardrobe = wardrobe();
        wardrobe.add_item(tee().with_id("x")).unwrap();
        let err = wardrobe.add_item(tee().with_id("x")).unwrap_err();
        assert!(matches!(err, BackendError::Validation(_)));
        assert_eq!(wardrobe.items().len(), 1);
    }

    #[test]
    fn generated_collisions_are_skipped() {
        struct Repeating(Vec<&'static str>);
        impl IdGenerator for Repeating {
            fn next_id(&mut self) -> String {
                self.0.remove(0).to_string()
            }
        }
        let mut wardrobe = Wardrobe::open(MemoryStore::new())
            .with_id_generator(Repeating(vec!["a", "a", "b"]));
        assert_eq!(wardrobe.add_item(tee()).unwrap().id, "a");
        assert_eq!(wardrobe.add_item(tee()).unwrap().id, "b");
    }

    #[test]
    fn update_keeps_position() {
        let mut wardrobe = wardrobe();
        wardrobe.add_item(tee()).unwrap();
        wardrobe.add_item(tee()).unwrap();
        wardrobe.add_item(tee()).unwrap();
        let edited = tee().with_id("id-2").with_brand("Levi's");
        wardrobe.update_item(edited.clone()).unwrap();
        assert_eq!(wardrobe.items()[1], edited);
        assert_eq!(
            wardrobe.items().iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["id-1", "id-2", "id-3"]
        );
    }

    #[test]
    fn delete_cascades_to_both_lists() {
        let recorder = Recorder::default();
        let mut wardrobe = wardrobe().with_notifier(recorder.clone());
        let item = wardrobe.add_item(tee()).unwrap();
        wardrobe.set_favorite(&item.id, true).unwrap();
        wardrobe.set_bookmark(&item.id, true).unwrap();
        wardrobe.set_favorite("inspiration-7", true).unwrap();

        wardrobe.delete_item(&item.id).unwrap();

        assert!(!wardrobe.is_favorite(&item.id));
        assert!(!wardrobe.is_bookmarked(&item.id));
        assert!(wardrobe.is_favorite("inspiration-7"));
        let store = wardrobe.store();
        assert_eq!(store.raw(FAVORITES_KEY), Some(r#"["inspiration-7"]"#));
        assert_eq!(store.raw(BOOKMARKS_KEY), Some("[]"));
        assert_eq!(store.raw(WARDROBE_ITEMS_KEY), Some("[]"));
        assert_eq!(
            recorder.0.borrow().last(),
            Some(&Notice::ItemDeleted { id: item.id })
        );
    }

    #[test]
    fn delete_unknown_is_not_found_and_writes_nothing() {
        let mut wardrobe = wardrobe();
        let err = wardrobe.delete_item("ghost").unwrap_err();
        assert_eq!(err, BackendError::NotFound("wardrobe item 'ghost'".into()));
        assert_eq!(wardrobe.store().write_count(), 0);
    }

    #[test]
    fn outfit_update_keeps_creation_time() {
        let mut wardrobe = wardrobe();
        let shirt = wardrobe.add_item(tee()).unwrap();
        let outfit = wardrobe
            .add_outfit(OutfitItem {
                id: String::new(),
                name: "Weekend".into(),
                description: None,
                items: vec![shirt.clone()],
                created_at: String::new(),
            })
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&outfit.created_at).is_ok());
        assert!(outfit.created_at.ends_with('Z'));

        let mut edited = outfit.clone();
        edited.name = "Lazy weekend".into();
        edited.created_at = "1999-01-01T00:00:00.000Z".into();
        let stored = wardrobe.update_outfit(edited).unwrap();
        assert_eq!(stored.created_at, outfit.created_at);
        assert_eq!(wardrobe.outfits()[0].name, "Lazy weekend");
    }

    #[test]
    fn outfit_snapshots_do_not_follow_item_edits() {
        let mut wardrobe = wardrobe();
        let shirt = wardrobe.add_item(tee().with_description("Blue")).unwrap();
        wardrobe
            .add_outfit(OutfitItem {
                id: "o".into(),
                name: "Office".into(),
                description: None,
                items: vec![shirt.clone()],
                created_at: String::new(),
            })
            .unwrap();
        wardrobe
            .update_item(shirt.clone().with_description("Red"))
            .unwrap();
        assert_eq!(
            wardrobe.outfit("o").unwrap().items[0].description.as_deref(),
            Some("Blue")
        );
    }

    #[test]
    fn membership_insert_is_idempotent() {
        let mut wardrobe = wardrobe();
        wardrobe.set_bookmark("a", true).unwrap();
        wardrobe.set_bookmark("a", true).unwrap();
        assert_eq!(wardrobe.bookmarks().len(), 1);
        assert_eq!(wardrobe.overlay_revision(), 1);
        assert_eq!(wardrobe.store().raw(BOOKMARKS_KEY), Some(r#"["a"]"#));
    }

    #[test]
    fn blank_membership_id_is_rejected() {
        let mut wardrobe = wardrobe();
        assert!(wardrobe.set_favorite("  ", true).is_err());
        assert_eq!(wardrobe.store().write_count(), 0);
    }

    #[test]
    fn write_failure_keeps_memory_and_notifies() {
        let recorder = Recorder::default();
        let mut wardrobe = Wardrobe::open(MemoryStore::with_quota(8))
            .with_id_generator(Sequential(0))
            .with_notifier(recorder.clone());

        let item = wardrobe.add_item(tee()).unwrap();

        assert_eq!(wardrobe.items().len(), 1);
        assert_eq!(wardrobe.store().raw(WARDROBE_ITEMS_KEY), None);
        let notices = recorder.0.borrow();
        assert!(matches!(
            &notices[0],
            Notice::PersistFailed { key, .. } if *key == WARDROBE_ITEMS_KEY
        ));
        assert_eq!(notices[1], Notice::ItemAdded { id: item.id });
    }

    #[test]
    fn theme_is_persisted() {
        let mut wardrobe = wardrobe();
        assert_eq!(wardrobe.theme(), None);
        wardrobe.set_theme(Theme::Light);
        let reopened = Wardrobe::open(wardrobe.into_store());
        assert_eq!(reopened.theme(), Some(Theme::Light));
    }

    #[test]
    fn blank_and_repeated_stored_ids_are_replaced_on_open() {
        let mut store = MemoryStore::new();
        store.seed(
            WARDROBE_ITEMS_KEY,
            r#"[{"imageUrl":"a","category":"Tops"},{"imageUrl":"b","category":"Bottoms"},{"id":"x","imageUrl":"c","category":"Tops"},{"id":"x","imageUrl":"d","category":"Tops"}]"#,
        );
        store.seed(
            OUTFITS_KEY,
            r#"[{"id":"","name":"One","items":[],"createdAt":""},{"id":"","name":"Two","items":[],"createdAt":""}]"#,
        );

        let wardrobe = Wardrobe::open(store);
        let ids: Vec<_> = wardrobe.items().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids[2], "x");
        assert!(ids.iter().all(|id| !id.is_empty()));
        let distinct: HashSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), 4);
        assert_ne!(wardrobe.outfits()[0].id, wardrobe.outfits()[1].id);

        assert_eq!(
            persistence::load_wardrobe_items(wardrobe.store()),
            wardrobe.items()
        );
        assert_eq!(persistence::load_outfits(wardrobe.store()), wardrobe.outfits());
    }

    #[test]
    fn clean_stored_ids_are_not_rewritten() {
        let mut store = MemoryStore::new();
        store.seed(
            WARDROBE_ITEMS_KEY,
            r#"[{"id":"a","imageUrl":"a","category":"Tops"}]"#,
        );
        let wardrobe = Wardrobe::open(store);
        assert_eq!(wardrobe.items()[0].id, "a");
        assert_eq!(wardrobe.store().write_count(), 0);
    }

    #[test]
    fn replacing_inspiration_invalidates_its_cache() {
        let mut wardrobe = wardrobe();
        let mut cache = ProjectionCache::new();
        let filter = ViewFilter::all();

        wardrobe.set_inspiration(vec![tee().with_id("inspiration-1")]);
        let first = cache
            .get(
                wardrobe.inspiration(),
                wardrobe.inspiration_revision(),
                wardrobe.overlays(),
                wardrobe.overlay_revision(),
                &filter,
            )
            .len();
        assert_eq!(first, 1);

        wardrobe.set_inspiration(vec![
            tee().with_id("inspiration-1"),
            tee().with_id("inspiration-2"),
        ]);
        let second = cache
            .get(
                wardrobe.inspiration(),
                wardrobe.inspiration_revision(),
                wardrobe.overlays(),
                wardrobe.overlay_revision(),
                &filter,
            )
            .len();
        assert_eq!(second, 2);
        assert_eq!(cache.recomputes(), 2);
    }
}
