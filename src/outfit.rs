use crate::backend::{BackendError, sanitize_text, validate_outfit};
use crate::models::{ClothingItem, OutfitItem};
use crate::projection::{ViewFilter, categories};

/// In-progress outfit selection. Selected items are copies, so later
/// wardrobe edits never reach a saved outfit.
#[derive(Debug, Clone, Default)]
pub struct OutfitDraft {
    pub name: String,
    pub description: String,
    selected: Vec<ClothingItem>,
    category_filter: Option<String>,
}

impl OutfitDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(outfit: &OutfitItem) -> Self {
        Self {
            name: outfit.name.clone(),
            description: outfit.description.clone().unwrap_or_default(),
            selected: outfit.items.clone(),
            category_filter: None,
        }
    }

    pub fn selected(&self) -> &[ClothingItem] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|item| item.id == id)
    }

    /// Selects the item, or deselects it when an item with the same id is
    /// already selected. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, item: &ClothingItem) -> bool {
        if self.is_selected(&item.id) {
            self.remove(&item.id);
            false
        } else {
            self.selected.push(item.clone());
            true
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.selected.retain(|item| item.id != id);
    }

    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.category_filter = category;
    }

    /// Filter for the pick-from-wardrobe grid.
    pub fn grid_filter(&self) -> ViewFilter {
        ViewFilter::all().with_category(self.category_filter.clone())
    }

    /// Categories offered for narrowing the pick grid.
    pub fn grid_categories(wardrobe: &[ClothingItem]) -> Vec<String> {
        categories(wardrobe)
    }

    /// Builds the outfit to save. When editing, pass the stored outfit so its
    /// id and creation time carry over; new outfits get both on add.
    pub fn into_outfit(self, existing: Option<&OutfitItem>) -> Result<OutfitItem, BackendError> {
        let description = sanitize_text(&self.description).trim().to_string();
        let outfit = OutfitItem {
            id: existing.map(|o| o.id.clone()).unwrap_or_default(),
            name: sanitize_text(&self.name).trim().to_string(),
            description: (!description.is_empty()).then_some(description),
            items: self.selected,
            created_at: existing.map(|o| o.created_at.clone()).unwrap_or_default(),
        };
        validate_outfit(&outfit)?;
        Ok(outfit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str) -> ClothingItem {
        ClothingItem::new("u", category).with_id(id)
    }

    #[test]
    fn toggle_selects_then_deselects() {
        let mut draft = OutfitDraft::new();
        let shirt = item("shirt", "Tops");
        assert!(draft.toggle(&shirt));
        assert!(draft.is_selected("shirt"));
        assert!(!draft.toggle(&shirt));
        assert!(draft.selected().is_empty());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let draft = OutfitDraft {
            name: "Date night".into(),
            ..OutfitDraft::new()
        };
        assert_eq!(
            draft.into_outfit(None),
            Err(BackendError::Validation(
                "an outfit needs at least one item".into()
            ))
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut draft = OutfitDraft::new();
        draft.name = "   ".into();
        draft.toggle(&item("shirt", "Tops"));
        assert!(matches!(draft.into_outfit(None), Err(BackendError::Validation(_))));
    }

    #[test]
    fn editing_keeps_id_and_creation_time() {
        let stored = OutfitItem {
            id: "o-1".into(),
            name: "Gym".into(),
            description: Some("Leg day".into()),
            items: vec![item("shorts", "Activewear")],
            created_at: "2024-03-02T10:00:00.000Z".into(),
        };
        let mut draft = OutfitDraft::edit(&stored);
        draft.toggle(&item("tee", "Tops"));
        draft.remove("shorts");
        draft.description.clear();
        let outfit = draft.into_outfit(Some(&stored)).unwrap();
        assert_eq!(outfit.id, "o-1");
        assert_eq!(outfit.created_at, stored.created_at);
        assert_eq!(outfit.description, None);
        assert_eq!(outfit.items, vec![item("tee", "Tops")]);
    }

    #[test]
    fn grid_filter_follows_selected_category() {
        let mut draft = OutfitDraft::new();
        assert_eq!(draft.grid_filter(), ViewFilter::all());
        draft.set_category_filter(Some("Footwear".into()));
        assert_eq!(draft.grid_filter(), ViewFilter::category("Footwear"));
        let wardrobe = [item("a", "Tops"), item("b", "Footwear"), item("c", "Tops")];
        assert_eq!(OutfitDraft::grid_categories(&wardrobe), ["Tops", "Footwear"]);
    }
}
