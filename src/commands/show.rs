//! Resolve and print a single document

use anyhow::{bail, Result};

use crate::content::{ContentSource, ContentType, Document};
use crate::helpers::full_url_for;
use crate::LearnSite;

/// Fetch the document of `content_type` addressed by `route`
pub async fn resolve(site: &LearnSite, content_type: ContentType, route: &str) -> Result<Document> {
    let id = content_type.route_scheme().parse(route);
    match site.store().get_one(content_type, &id).await {
        Ok(doc) => Ok(doc),
        Err(e) if e.is_not_found() => bail!("No {} found at route {:?}", content_type, route),
        Err(e) => Err(e.into()),
    }
}

pub async fn run(site: &LearnSite, content_type: ContentType, route: &str) -> Result<()> {
    let doc = resolve(site, content_type, route).await?;
    let id = content_type.route_scheme().route_id(&doc.sys);

    println!("{}", doc.title());
    println!("  type: {}", content_type);
    println!("  file: {}/{}", content_type.dir(), doc.sys.relative_path);
    println!("  url:  {}", full_url_for(&site.config, &content_type.url_path(&id)));
    print!("{}", serde_yaml::to_string(&doc.fields)?);
    if !doc.body.trim().is_empty() {
        println!("--- body ({} bytes)", doc.body.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_resolve_document() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        let site = LearnSite::new(dir.path()).unwrap();

        let doc = resolve(&site, ContentType::Module, "/blue-team/log-analysis/")
            .await
            .unwrap();
        assert_eq!(doc.title(), "Log Analysis");

        let err = resolve(&site, ContentType::Lab, "missing").await.unwrap_err();
        assert!(err.to_string().contains("No lab found"));
    }
}
