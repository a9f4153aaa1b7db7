//! Generate static files

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::content::ContentType;
use crate::generator::{BuildReport, Generator};
use crate::{LearnSite, CONFIG_FILE};

/// Generate the whole site from its content store
pub async fn run(site: &LearnSite) -> Result<BuildReport> {
    let start = Instant::now();

    let store = site.store();
    let report = Generator::new(site, &store)?.generate().await?;

    for content_type in ContentType::ALL {
        tracing::debug!(
            "{}: {} pages",
            content_type.label(),
            report.count(content_type)
        );
    }
    tracing::info!(
        "Generated {} pages in {:.2}s",
        report.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Reload the configuration and regenerate; failures are logged
pub async fn rebuild(site: &mut LearnSite) {
    match LearnSite::new(&site.base_dir) {
        Ok(reloaded) => *site = reloaded,
        Err(e) => tracing::warn!("Keeping previous configuration: {:#}", e),
    }

    if let Err(e) = run(site).await {
        tracing::error!("Generation failed: {:#}", e);
    }
}

/// Watch for file changes and regenerate
pub async fn watch(site: &LearnSite) -> Result<()> {
    let mut site = site.clone();
    let mut watcher = ContentWatcher::new(&site)?;

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");
    while let Some(changed) = watcher.changed().await {
        for path in &changed {
            tracing::info!("File changed: {}", path.display());
        }
        rebuild(&mut site).await;
    }

    Ok(())
}

/// Debounced watcher over the content directory and the config file
pub struct ContentWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: mpsc::UnboundedReceiver<DebounceEventResult>,
}

impl ContentWatcher {
    pub fn new(site: &LearnSite) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let mut debouncer =
            new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
                let _ = tx.send(res);
            })?;

        if site.content_dir.exists() {
            debouncer
                .watcher()
                .watch(&site.content_dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", site.content_dir);
        }

        let config_path = site.base_dir.join(CONFIG_FILE);
        if config_path.exists() {
            debouncer
                .watcher()
                .watch(&config_path, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", config_path);
        }

        Ok(Self {
            _debouncer: debouncer,
            events,
        })
    }

    /// Next batch of relevant changed paths, `None` once the watcher stops
    pub async fn changed(&mut self) -> Option<Vec<PathBuf>> {
        loop {
            match self.events.recv().await? {
                Ok(events) => {
                    let changed: Vec<PathBuf> = events
                        .into_iter()
                        .map(|e| e.path)
                        .filter(|p| is_relevant(p))
                        .collect();
                    if !changed.is_empty() {
                        return Some(changed);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }
    }
}

/// Editor swap files and VCS metadata never trigger a rebuild
fn is_relevant(path: &Path) -> bool {
    let path = path.to_string_lossy();
    !path.contains(".git")
        && !path.contains(".DS_Store")
        && !path.ends_with('~')
        && !path.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_generate_initialized_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = LearnSite::new(dir.path()).unwrap();
        let report = run(&site).await.unwrap();

        for content_type in ContentType::ALL {
            assert!(report.count(content_type) > 0, "no {} pages", content_type);
        }
        assert!(site.public_dir.join("index.html").exists());
        assert!(site.public_dir.join("routes.json").exists());
        assert!(site.public_dir.join("css/site.css").exists());
    }

    #[tokio::test]
    async fn test_rebuild_picks_up_config_changes() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        let mut site = LearnSite::new(dir.path()).unwrap();

        std::fs::write(dir.path().join(CONFIG_FILE), "title: Renamed\npublic_dir: out\n").unwrap();
        rebuild(&mut site).await;

        assert_eq!(site.config.title, "Renamed");
        let index = std::fs::read_to_string(dir.path().join("out/index.html")).unwrap();
        assert!(index.contains("Renamed"));
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("content/labs/a.mdx")));
        assert!(!is_relevant(Path::new("content/.git/index")));
        assert!(!is_relevant(Path::new("content/labs/a.mdx~")));
    }
}
