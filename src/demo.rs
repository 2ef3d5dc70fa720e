//! Sample catalog used to populate an empty wardrobe.

use once_cell::sync::Lazy;
use rand::Rng;

use crate::backend::BackendError;
use crate::models::{ClothingItem, INSPIRATION_CATEGORY, dedupe_tags};
use crate::storage::KeyValueStore;
use crate::wardrobe::Wardrobe;

const UNSPLASH_PARAMS: &str = "ixlib=rb-4.0.3&auto=format&fit=crop&w=687&q=80";

static DEMO_IMAGES: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "photo-1552374196-1ab2a1c593e8",
        "photo-1617127365659-c47fa864d8bc",
        "photo-1576566588028-4147f3842f27",
        "photo-1521223890158-f9f7c3d5d504",
        "photo-1516826957135-700dedea698c",
        "photo-1611312449408-fcece27cdbb7",
        "photo-1626497764746-6dc36546b388",
        "photo-1542272604-787c3835535d",
        "photo-1620331311520-246422fd82f9",
        "photo-1591047139829-d91aecb6caea",
        "photo-1521369909029-2afed882baee",
        "photo-1550246140-5119ae4790b8",
    ]
    .iter()
    .map(|photo| unsplash_url(photo))
    .collect()
});

static INSPIRATION_IMAGES: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "photo-1534030347209-467a5b0ad3e6",
        "photo-1614252369475-531eba835eb1",
        "photo-1617137968427-85924c800a22",
        "photo-1571908598047-29b5c8579aca",
        "photo-1577909659949-792204ced365",
        "photo-1505022610485-0249ba5b3675",
        "photo-1612462766564-839041a81af7",
        "photo-1550418290-a8d86ad674a6",
        "photo-1583855282680-6dbdc7a26b1c",
    ]
    .iter()
    .map(|photo| unsplash_url(photo))
    .collect()
});

const CATEGORIES: [&str; 6] = ["Tops", "Bottoms", "Outerwear", "Footwear", "Accessories", "Formal"];

const DESCRIPTIONS: [&str; 12] = [
    "White oxford shirt",
    "Black slim jeans",
    "Navy blue blazer",
    "Grey hoodie",
    "Brown leather jacket",
    "Khaki chinos",
    "White sneakers",
    "Black dress shoes",
    "Denim jacket",
    "Black leather belt",
    "Navy blue suit",
    "Casual watch",
];

const TAGS: [&str; 16] = [
    "casual", "formal", "summer", "winter", "spring", "fall", "work", "weekend", "evening",
    "party", "sports", "workout", "streetwear", "business", "vintage", "modern",
];

const COLORS: [&str; 9] = [
    "#000000", "#0A3161", "#333333", "#5D8AA8", "#7B3F00", "#D3D3D3", "#FFFFFF", "#1560BD",
    "#6F4E37",
];

const BRANDS: [&str; 8] = [
    "Nike",
    "Adidas",
    "Levi's",
    "H&M",
    "Zara",
    "Under Armour",
    "Calvin Klein",
    "Ralph Lauren",
];

const DEMO_SEASONS: [&str; 5] = ["Spring", "Summer", "Fall", "Winter", "All Seasons"];

const INSPIRATION_TAGS: [&str; 4] = ["outfit", "inspiration", "men's style", "fashion"];

fn unsplash_url(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}?{UNSPLASH_PARAMS}")
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values[rng.random_range(0..values.len())]
}

/// One item per demo image. Category and description cycle in order; tags,
/// color, brand and season are random. Ids are left blank.
pub fn wardrobe_items<R: Rng>(rng: &mut R) -> Vec<ClothingItem> {
    DEMO_IMAGES
        .iter()
        .enumerate()
        .map(|(index, image_url)| {
            let tag_count = rng.random_range(2..=4);
            let tags = (0..tag_count)
                .map(|_| pick(rng, &TAGS).to_string())
                .collect::<Vec<_>>();
            ClothingItem::new(image_url.clone(), CATEGORIES[index % CATEGORIES.len()])
                .with_description(DESCRIPTIONS[index % DESCRIPTIONS.len()])
                .with_tags(dedupe_tags(tags))
                .with_color(pick(rng, &COLORS))
                .with_brand(pick(rng, &BRANDS))
                .with_season(pick(rng, &DEMO_SEASONS))
        })
        .collect()
}

/// Read-only inspiration feed with stable ids so favorites survive restarts.
pub fn inspiration_items() -> Vec<ClothingItem> {
    INSPIRATION_IMAGES
        .iter()
        .enumerate()
        .map(|(index, image_url)| {
            ClothingItem::new(image_url.clone(), INSPIRATION_CATEGORY)
                .with_id(format!("inspiration-{}", index + 1))
                .with_tags(INSPIRATION_TAGS)
        })
        .collect()
}

/// Adds the demo items to `wardrobe` and favorites roughly 30% of them.
/// Returns how many items were added.
pub fn seed<S, R>(wardrobe: &mut Wardrobe<S>, rng: &mut R) -> Result<usize, BackendError>
where
    S: KeyValueStore,
    R: Rng,
{
    let items = wardrobe_items(rng);
    let count = items.len();
    for item in items {
        let stored = wardrobe.add_item(item)?;
        if rng.random_bool(0.3) {
            wardrobe.set_favorite(&stored.id, true)?;
        }
    }
    tracing::info!(count, "seeded demo wardrobe");
    Ok(count)
}
