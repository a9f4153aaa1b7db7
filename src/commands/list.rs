//! List the static routes of a collection

use anyhow::Result;

use crate::content::ContentType;
use crate::helpers::url_for;
use crate::routes::{static_paths, RouteId};
use crate::LearnSite;

/// Enumerate every route of a collection
pub async fn routes(site: &LearnSite, content_type: ContentType) -> Result<Vec<RouteId>> {
    Ok(static_paths(&site.store(), content_type).await?)
}

/// Print the routes of one collection, or of every collection for `all`
pub async fn run(site: &LearnSite, type_name: &str) -> Result<()> {
    let content_types = match type_name {
        "all" | "routes" => ContentType::ALL.to_vec(),
        name => vec![name.parse::<ContentType>()?],
    };

    for content_type in content_types {
        let ids = routes(site, content_type).await?;
        println!("{} ({}):", content_type.label(), ids.len());
        for id in ids {
            println!(
                "  {:<40} {}",
                id.path(),
                url_for(&site.config, &content_type.url_path(&id))
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_routes_of_initialized_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        let site = LearnSite::new(dir.path()).unwrap();

        let lessons = routes(&site, ContentType::Lesson).await.unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].path(), "blue-team/log-analysis/reading-logs");

        let instructors = routes(&site, ContentType::Instructor).await.unwrap();
        assert_eq!(instructors, vec![RouteId::Filename("jane-doe".to_string())]);
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_type() {
        let dir = TempDir::new().unwrap();
        let site = LearnSite::new(dir.path()).unwrap();
        assert!(run(&site, "skill").await.is_err());
        assert!(run(&site, "all").await.is_ok());
    }
}
