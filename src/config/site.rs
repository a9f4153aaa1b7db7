//! Site configuration (_config.yml)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::ContentType;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Content listing
    /// Documents per listing page when enumerating a collection
    pub page_size: usize,
    /// Seconds between background rebuilds while serving, 0 disables
    pub revalidate: u64,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    pub meta_generator: bool,

    // Navigation
    #[serde(default = "default_nav")]
    pub nav: Vec<MenuItem>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Learning Portal".to_string(),
            description: String::new(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),

            page_size: 50,
            revalidate: 300,

            highlight: HighlightConfig::default(),
            meta_generator: true,

            nav: default_nav(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the generator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if !self.root.starts_with('/') {
            bail!("root must start with '/', got {:?}", self.root);
        }
        if self.content_dir.trim().is_empty() || self.public_dir.trim().is_empty() {
            bail!("content_dir and public_dir must not be empty");
        }
        Ok(())
    }
}

/// A header menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub path: String,
}

fn default_nav() -> Vec<MenuItem> {
    ContentType::LEARNING
        .into_iter()
        .map(|c| MenuItem {
            label: c.label().to_string(),
            path: c.index_path(),
        })
        .collect()
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// Name of a syntect default theme
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
