use crate::models::{ClothingItem, OutfitItem, parse_tags};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Raw form input for a wardrobe item. Blank strings mean "not set".
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    pub id: Option<String>,
    pub image_url: String,
    pub category: String,
    pub description: String,
    pub tags: String,
    pub color: String,
    pub brand: String,
    pub season: String,
}

impl ItemDraft {
    pub fn from_item(item: &ClothingItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            image_url: item.image_url.clone(),
            category: item.category.clone(),
            description: item.description.clone().unwrap_or_default(),
            tags: item.tags.join(", "),
            color: item.color.clone().unwrap_or_default(),
            brand: item.brand.clone().unwrap_or_default(),
            season: item.season.clone().unwrap_or_default(),
        }
    }

    pub fn into_item(self) -> Result<ClothingItem, BackendError> {
        let item = ClothingItem {
            id: self.id.map(|id| id.trim().to_string()).unwrap_or_default(),
            image_url: self.image_url.trim().to_string(),
            category: sanitize_text(&self.category).trim().to_string(),
            description: optional_text(&self.description),
            tags: parse_tags(&sanitize_text(&self.tags)),
            color: optional_text(&self.color),
            brand: optional_text(&self.brand),
            season: optional_text(&self.season),
        };
        validate_item(&item)?;
        Ok(item)
    }
}

pub fn validate_item(item: &ClothingItem) -> Result<(), BackendError> {
    if item.image_url.trim().is_empty() {
        return Err(BackendError::Validation(
            "an image is required".to_string(),
        ));
    }
    if item.category.trim().is_empty() {
        return Err(BackendError::Validation(
            "a category is required".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_outfit(outfit: &OutfitItem) -> Result<(), BackendError> {
    if outfit.name.trim().is_empty() {
        return Err(BackendError::Validation(
            "outfit name must not be empty".to_string(),
        ));
    }
    if outfit.items.is_empty() {
        return Err(BackendError::Validation(
            "an outfit needs at least one item".to_string(),
        ));
    }
    Ok(())
}

/// Strip control characters other than common whitespace.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            if c == '\n' || c == '\t' || c == '\r' {
                return true;
            }
            if c < ' ' {
                return false;
            }
            c != '\u{FFFD}' && c != '\u{FEFF}'
        })
        .collect()
}

fn optional_text(value: &str) -> Option<String> {
    let value = sanitize_text(value);
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
