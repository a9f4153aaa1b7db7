//! learnsite: static path enumeration and site generation for a learning portal
//!
//! Content lives in markdown/MDX files under `content/<collection>/`. Every
//! collection is walked through a cursor-paginated listing to produce the
//! route identifiers of its pages, and each route is rendered with embedded
//! Tera templates.

pub mod blocks;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod routes;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Config file name at the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// A learning site rooted at a directory
#[derive(Debug, Clone)]
pub struct LearnSite {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl LearnSite {
    /// Open a site, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// The file-backed content source of this site
    pub fn store(&self) -> content::FsContentStore {
        content::FsContentStore::new(&self.content_dir, self.config.page_size)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<generator::BuildReport> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
