use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

pub const DB_FILE_NAME: &str = "wardrobe.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Fill an empty wardrobe with sample items on first start.
    pub seed_demo_data: bool,
}

impl Config {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            seed_demo_data: true,
        }
    }

    /// Database under the platform data directory.
    pub fn platform_default() -> Result<Self> {
        Ok(Self::new(default_db_path()?))
    }

    pub fn without_demo_data(mut self) -> Self {
        self.seed_demo_data = false;
        self
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("org", "Wardrobe", "wardrobe")
        .context("Cannot determine project dirs")?;
    Ok(proj.data_dir().join(DB_FILE_NAME))
}
