use anyhow::Result;
use tracing_subscriber::EnvFilter;

use wardrobe::config::Config;
use wardrobe::db::SqliteStore;
use wardrobe::{ViewFilter, Wardrobe, demo};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::platform_default()?;
    let store = SqliteStore::open(&config.db_path)?;
    let mut wardrobe = Wardrobe::open(store);

    if config.seed_demo_data && wardrobe.items().is_empty() {
        demo::seed(&mut wardrobe, &mut rand::rng())?;
    }
    wardrobe.set_inspiration(demo::inspiration_items());

    // Usage: wardrobe [query] [category]
    let mut args = std::env::args().skip(1);
    let filter = ViewFilter::query(args.next().unwrap_or_default()).with_category(args.next());

    println!("categories: {}", wardrobe.categories().join(", "));
    for view in wardrobe.view(&filter) {
        let item = &view.item;
        println!(
            "{} {}{} [{}] {}  #{}",
            item.id,
            if view.is_favorite { "*" } else { " " },
            if view.is_bookmarked { "b" } else { " " },
            item.category,
            item.description.as_deref().unwrap_or("-"),
            item.tags.join(" #"),
        );
    }
    println!("outfits: {}", wardrobe.outfits().len());
    Ok(())
}
