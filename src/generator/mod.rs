//! Generator module - renders every routable document into static HTML

use anyhow::{bail, Context as _, Result};
use chrono::Datelike;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use tera::Context;

use crate::blocks::{parse_blocks, BlockRenderer};
use crate::content::{ContentSource, ContentType, Document, MarkdownRenderer};
use crate::helpers::{
    escape_html, full_url_for, meta_generator, open_graph, strip_html, truncate, url_for,
};
use crate::routes::{static_paths, RouteId};
use crate::templates::{
    DocumentView, EntryData, FactData, FlagData, LinkData, NavItem, PageData, SectionData,
    SiteData, StepData, TemplateRenderer, SITE_CSS,
};
use crate::LearnSite;

/// Header facts per collection: (field, label, unit)
const LAB_FACTS: &[(&str, &str, &str)] = &[
    ("labType", "Type", ""),
    ("difficulty", "Difficulty", ""),
    ("durationMinutes", "Duration", " min"),
    ("timeLimitMinutes", "Time limit", " min"),
    ("totalPoints", "Points", ""),
    ("maxAttempts", "Attempts", ""),
    ("accessLevel", "Access", ""),
];
const LESSON_FACTS: &[(&str, &str, &str)] = &[
    ("order", "Lesson", ""),
    ("durationMinutes", "Duration", " min"),
];
const MODULE_FACTS: &[(&str, &str, &str)] = &[
    ("difficulty", "Difficulty", ""),
    ("durationHours", "Duration", " h"),
    ("accessLevel", "Access", ""),
];
const TRACK_FACTS: &[(&str, &str, &str)] = &[
    ("trackType", "Type", ""),
    ("difficulty", "Difficulty", ""),
    ("estimatedHours", "Estimated", " h"),
    ("durationHours", "Duration", " h"),
    ("accessLevel", "Access", ""),
];

/// Fields holding structured data rendered by dedicated sections
const STRUCTURED_FIELDS: &[&str] = &["blocks", "steps", "flags"];

/// One generated page
#[derive(Debug, Clone, Serialize)]
pub struct RouteRecord {
    pub collection: ContentType,
    pub route: String,
    pub url: String,
}

/// Outcome of a full build
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub routes: Vec<RouteRecord>,
}

impl BuildReport {
    /// Number of pages generated for a collection
    pub fn count(&self, content_type: ContentType) -> usize {
        self.routes
            .iter()
            .filter(|r| r.collection == content_type)
            .count()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A loaded document and its route
struct Entry {
    id: RouteId,
    doc: Document,
}

/// Every loaded document of a build
#[derive(Default)]
struct Catalog {
    entries: BTreeMap<ContentType, Vec<Entry>>,
    titles: HashMap<(ContentType, RouteId), String>,
}

impl Catalog {
    fn insert(&mut self, content_type: ContentType, entries: Vec<Entry>) {
        for entry in &entries {
            self.titles
                .insert((content_type, entry.id.clone()), entry.doc.title());
        }
        self.entries.insert(content_type, entries);
    }

    fn entries(&self, content_type: ContentType) -> &[Entry] {
        self.entries
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn title(&self, content_type: ContentType, id: &RouteId) -> Option<&str> {
        self.titles
            .get(&(content_type, id.clone()))
            .map(String::as_str)
    }

    fn contains(&self, content_type: ContentType, id: &RouteId) -> bool {
        self.title(content_type, id).is_some()
    }

    /// Fail when two pages would be written to the same URL path
    fn check_output_paths(&self) -> Result<()> {
        let mut owners: HashMap<String, String> = ContentType::LEARNING
            .into_iter()
            .map(|ct| (ct.index_path(), format!("the {} listing", ct.label())))
            .collect();

        for (content_type, entries) in &self.entries {
            for entry in entries {
                let url_path = content_type.url_path(&entry.id);
                let owner = format!("{} {}", content_type, entry.id);
                if let Some(existing) = owners.get(&url_path) {
                    bail!("{} and {} both render to {}", owner, existing, url_path);
                }
                owners.insert(url_path, owner);
            }
        }
        Ok(())
    }
}

/// Static site generator over a content source
pub struct Generator<'a, S> {
    site: &'a LearnSite,
    source: &'a S,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
    site_data: SiteData,
}

impl<'a, S: ContentSource + Sync> Generator<'a, S> {
    /// Create a new generator
    pub fn new(site: &'a LearnSite, source: &'a S) -> Result<Self> {
        let config = &site.config;
        let site_data = SiteData {
            title: escape_html(&config.title),
            description: escape_html(&config.description),
            language: config.language.clone(),
            root: url_for(config, "/"),
            nav: config
                .nav
                .iter()
                .map(|item| NavItem {
                    label: escape_html(&item.label),
                    url: url_for(config, &item.path),
                })
                .collect(),
            year: chrono::Local::now().year(),
        };

        Ok(Self {
            site,
            source,
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_options(&config.highlight),
            site_data,
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<BuildReport> {
        let catalog = self.load_catalog().await?;
        catalog.check_output_paths()?;

        fs::create_dir_all(&self.site.public_dir)?;
        self.write_file("/css/site.css", SITE_CSS)?;

        let mut report = BuildReport::default();
        for (content_type, entries) in &catalog.entries {
            for entry in entries {
                let url = self
                    .render_document(&catalog, entry)
                    .with_context(|| format!("Failed to render {} {}", content_type, entry.id))?;
                report.routes.push(RouteRecord {
                    collection: *content_type,
                    route: entry.id.path(),
                    url,
                });
            }
        }

        for content_type in ContentType::LEARNING {
            self.render_listing(&catalog, content_type)?;
        }

        let home = RouteId::Breadcrumbs(vec!["home".to_string()]);
        if !catalog.contains(ContentType::Page, &home) {
            self.render_home(&catalog)?;
        }

        self.render_not_found()?;
        self.write_manifest(&report)?;

        Ok(report)
    }

    /// Enumerate and load every collection; collections load concurrently
    async fn load_catalog(&self) -> Result<Catalog> {
        let (instructors, labs, lessons, modules, tracks, pages) = tokio::try_join!(
            self.load_collection(ContentType::Instructor),
            self.load_collection(ContentType::Lab),
            self.load_collection(ContentType::Lesson),
            self.load_collection(ContentType::Module),
            self.load_collection(ContentType::Track),
            self.load_collection(ContentType::Page),
        )?;

        let mut catalog = Catalog::default();
        for (content_type, entries) in [instructors, labs, lessons, modules, tracks, pages] {
            catalog.insert(content_type, entries);
        }
        Ok(catalog)
    }

    async fn load_collection(&self, content_type: ContentType) -> Result<(ContentType, Vec<Entry>)> {
        let ids = static_paths(self.source, content_type)
            .await
            .with_context(|| format!("Failed to enumerate {} routes", content_type))?;

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.source.get_one(content_type, &id).await {
                Ok(doc) => entries.push(Entry { id, doc }),
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Skipping {} {}: {}", content_type, id, e);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to load {} {}", content_type, id))
                }
            }
        }

        Ok((content_type, entries))
    }

    /// Render one document page, returning its URL path
    fn render_document(&self, catalog: &Catalog, entry: &Entry) -> Result<String> {
        let content_type = entry.doc.sys.collection;
        let url_path = content_type.url_path(&entry.id);

        let view = self.document_view(catalog, entry)?;
        let page = PageData {
            title: escape_html(&entry.doc.title()),
            description: self.summary(&entry.doc).unwrap_or_default(),
            kind: content_type.name().to_string(),
            kind_label: capitalize(content_type.name()),
            ..self.page_data(&url_path)
        };

        let template = match content_type {
            ContentType::Instructor => "instructor.html",
            ContentType::Page => "page.html",
            _ => "learning.html",
        };

        let mut context = self.base_context(&page);
        view.insert_into(&mut context);
        let html = self.templates.render(template, &context)?;
        self.write_file(&url_path, &html)?;

        tracing::debug!("Generated {}", url_path);
        Ok(url_path)
    }

    fn document_view(&self, catalog: &Catalog, entry: &Entry) -> Result<DocumentView> {
        let doc = &entry.doc;
        let content_type = doc.sys.collection;

        let mut html = HashMap::new();
        for field in content_type.rich_text_fields() {
            if let Some(text) = doc.field_str(field) {
                html.insert(field.to_string(), self.markdown.render(text)?);
            }
        }

        let body = if doc.body.trim().is_empty() {
            String::new()
        } else {
            self.markdown.render(&doc.body)?
        };

        let mut view = DocumentView {
            doc: doc.fields.clone(),
            html,
            body,
            links: self.references(catalog, &doc.fields),
            ..Default::default()
        };

        match content_type {
            ContentType::Instructor => {
                view.related = self.referencing(catalog, ContentType::Module, "instructor", entry);
                view.related_label = ContentType::Module.label().to_string();
            }
            ContentType::Lab => {
                view.facts = facts(doc, LAB_FACTS);
                view.flags = flags(doc);
            }
            ContentType::Lesson => view.facts = facts(doc, LESSON_FACTS),
            ContentType::Module => {
                view.facts = facts(doc, MODULE_FACTS);
                view.related = self.referencing(catalog, ContentType::Lesson, "module", entry);
                view.related_label = ContentType::Lesson.label().to_string();
            }
            ContentType::Track => {
                view.facts = facts(doc, TRACK_FACTS);
                view.steps = self.steps(catalog, doc);
            }
            ContentType::Page => {
                let blocks = parse_blocks(doc)?;
                view.blocks =
                    BlockRenderer::new(&self.site.config, &self.markdown).render_all(&blocks)?;
            }
        }

        Ok(view)
    }

    /// Reference fields of a document, resolved to links where possible
    fn references(&self, catalog: &Catalog, fields: &Mapping) -> Vec<LinkData> {
        let mut links = Vec::new();
        for (key, value) in fields {
            let Some(key) = key.as_str() else { continue };
            if STRUCTURED_FIELDS.contains(&key) {
                continue;
            }

            let mut targets = Vec::new();
            collect_strings(value, &mut targets);
            for target in targets.into_iter().filter(|t| self.is_reference(t)) {
                links.push(self.link(catalog, &humanize(key), target));
            }
        }
        links
    }

    fn is_reference(&self, value: &str) -> bool {
        let prefix = format!("{}/", self.site.config.content_dir.trim_matches('/'));
        value.starts_with(&prefix) && value.contains('.')
    }

    fn link(&self, catalog: &Catalog, field: &str, reference: &str) -> LinkData {
        let resolved = ContentType::resolve_reference(&self.site.config.content_dir, reference)
            .filter(|(ct, id)| catalog.contains(*ct, id));

        match resolved {
            Some((content_type, id)) => LinkData {
                field: field.to_string(),
                label: escape_html(catalog.title(content_type, &id).unwrap_or_default()),
                url: Some(url_for(&self.site.config, &content_type.url_path(&id))),
            },
            None => LinkData {
                field: field.to_string(),
                label: escape_html(&humanize(reference_stem(reference))),
                url: None,
            },
        }
    }

    /// Documents of `content_type` whose `field` references `target`
    fn referencing(
        &self,
        catalog: &Catalog,
        content_type: ContentType,
        field: &str,
        target: &Entry,
    ) -> Vec<EntryData> {
        let target_type = target.doc.sys.collection;
        let mut matches: Vec<&Entry> = catalog
            .entries(content_type)
            .iter()
            .filter(|e| {
                e.doc
                    .field_str(field)
                    .and_then(|r| ContentType::resolve_reference(&self.site.config.content_dir, r))
                    .is_some_and(|(ct, id)| ct == target_type && id == target.id)
            })
            .collect();

        matches.sort_by_key(|e| (e.doc.order().unwrap_or(i64::MAX), e.doc.title()));
        matches.into_iter().map(|e| self.entry_data(e)).collect()
    }

    fn steps(&self, catalog: &Catalog, doc: &Document) -> Vec<StepData> {
        let Some(Value::Sequence(steps)) = doc.field("steps") else {
            return Vec::new();
        };

        let mut steps: Vec<&Mapping> = steps.iter().filter_map(Value::as_mapping).collect();
        steps.sort_by_key(|s| s.get("order").and_then(Value::as_i64).unwrap_or(i64::MAX));

        steps
            .into_iter()
            .map(|step| {
                let text = |key: &str| {
                    step.get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.trim().is_empty())
                };
                let flag = |key: &str, default: bool| {
                    step.get(key).and_then(Value::as_bool).unwrap_or(default)
                };

                let (reference_kind, reference) = match (text("module"), text("lab")) {
                    (Some(module), _) => ("module", Some(module)),
                    (None, Some(lab)) => ("lab", Some(lab)),
                    (None, None) => ("step", None),
                };
                let link = reference.map(|r| self.link(catalog, reference_kind, r));

                let name = text("name")
                    .map(escape_html)
                    .or_else(|| link.as_ref().map(|l| l.label.clone()))
                    .unwrap_or_else(|| "Untitled step".to_string());

                StepData {
                    name,
                    description: text("description").map(escape_html),
                    kind: text("stepType").unwrap_or(reference_kind).to_string(),
                    url: link.and_then(|l| l.url),
                    required: flag("isRequired", true),
                    locked: flag("isLocked", false),
                }
            })
            .collect()
    }

    fn render_listing(&self, catalog: &Catalog, content_type: ContentType) -> Result<()> {
        let url_path = content_type.index_path();
        let page = PageData {
            title: content_type.label().to_string(),
            kind: "listing".to_string(),
            kind_label: content_type.label().to_string(),
            ..self.page_data(&url_path)
        };

        let entries: Vec<EntryData> = catalog
            .entries(content_type)
            .iter()
            .map(|e| self.entry_data(e))
            .collect();

        let mut context = self.base_context(&page);
        context.insert("entries", &entries);
        let html = self.templates.render("list.html", &context)?;
        self.write_file(&url_path, &html)
    }

    fn render_home(&self, catalog: &Catalog) -> Result<()> {
        let page = PageData {
            kind: "home".to_string(),
            ..self.page_data("/")
        };

        let sections: Vec<SectionData> = ContentType::LEARNING
            .into_iter()
            .filter(|ct| !catalog.entries(*ct).is_empty())
            .map(|ct| {
                let entries = catalog.entries(ct);
                SectionData {
                    label: ct.label().to_string(),
                    url: url_for(&self.site.config, &ct.index_path()),
                    count: entries.len(),
                    entries: entries.iter().take(5).map(|e| self.entry_data(e)).collect(),
                }
            })
            .collect();

        let mut context = self.base_context(&page);
        context.insert("sections", &sections);
        let html = self.templates.render("home.html", &context)?;
        self.write_file("/", &html)
    }

    fn render_not_found(&self) -> Result<()> {
        let page = PageData {
            title: "Page not found".to_string(),
            kind: "not-found".to_string(),
            ..self.page_data("/404.html")
        };
        let html = self.templates.render("404.html", &self.base_context(&page))?;
        self.write_file("/404.html", &html)
    }

    fn write_manifest(&self, report: &BuildReport) -> Result<()> {
        let records: Vec<RouteRecord> = report
            .routes
            .iter()
            .map(|r| RouteRecord {
                url: full_url_for(&self.site.config, &r.url),
                ..r.clone()
            })
            .collect();
        let json = serde_json::to_string_pretty(&records)?;
        self.write_file("/routes.json", &json)
    }

    fn entry_data(&self, entry: &Entry) -> EntryData {
        let content_type = entry.doc.sys.collection;
        EntryData {
            title: escape_html(&entry.doc.title()),
            url: url_for(&self.site.config, &content_type.url_path(&entry.id)),
            summary: self.summary(&entry.doc),
        }
    }

    /// Short plain-text description of a document
    fn summary(&self, doc: &Document) -> Option<String> {
        if let Some(short) = doc
            .field_str("shortDescription")
            .or_else(|| doc.field_str("short_description"))
        {
            return Some(escape_html(&truncate(short, 160)));
        }

        let description = doc.field_str("description")?;
        let text = self
            .markdown
            .render(description)
            .map(|html| strip_html(&html))
            .unwrap_or_else(|_| description.to_string());
        Some(escape_html(&truncate(&text, 160)))
    }

    fn page_data(&self, url_path: &str) -> PageData {
        PageData {
            url: url_for(&self.site.config, url_path),
            permalink: full_url_for(&self.site.config, url_path),
            ..Default::default()
        }
    }

    fn base_context(&self, page: &PageData) -> Context {
        let config = &self.site.config;
        let mut head = open_graph(&page.title, &page.description, &page.permalink, &config.title);
        if config.meta_generator {
            head.push('\n');
            head.push_str(&meta_generator());
        }

        let mut context = Context::new();
        context.insert("site", &self.site_data);
        context.insert("page", page);
        context.insert("head", &head);
        context
    }

    /// Write output for a URL path; directory URLs get an `index.html`
    fn write_file(&self, url_path: &str, contents: &str) -> Result<()> {
        let path = output_path(&self.site.public_dir, url_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))
    }
}

/// File under `public_dir` that serves `url_path`
pub fn output_path(public_dir: &std::path::Path, url_path: &str) -> PathBuf {
    let relative = url_path.trim_start_matches('/');
    if relative.is_empty() || relative.ends_with('/') {
        public_dir.join(relative).join("index.html")
    } else {
        public_dir.join(relative)
    }
}

fn facts(doc: &Document, table: &[(&str, &str, &str)]) -> Vec<FactData> {
    table
        .iter()
        .filter_map(|(key, label, unit)| {
            let value = match doc.field(key)? {
                Value::String(s) if !s.trim().is_empty() => capitalize(s.trim()),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some(FactData {
                label: label.to_string(),
                value: escape_html(&format!("{}{}", value, unit)),
            })
        })
        .collect()
}

/// Capture-the-flag objectives in order; flag values are never published
fn flags(doc: &Document) -> Vec<FlagData> {
    let Some(Value::Sequence(flags)) = doc.field("flags") else {
        return Vec::new();
    };

    let mut flags: Vec<&Mapping> = flags.iter().filter_map(Value::as_mapping).collect();
    flags.sort_by_key(|f| f.get("order").and_then(Value::as_i64).unwrap_or(i64::MAX));

    flags
        .into_iter()
        .enumerate()
        .map(|(i, flag)| FlagData {
            name: flag
                .get("name")
                .and_then(Value::as_str)
                .map(escape_html)
                .unwrap_or_else(|| format!("Flag {}", i + 1)),
            description: flag
                .get("description")
                .and_then(Value::as_str)
                .map(escape_html),
            points: flag.get("points").and_then(Value::as_i64),
        })
        .collect()
}

/// Strings of a field value, one level into lists and objects
fn collect_strings<'v>(value: &'v Value, out: &mut Vec<&'v str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::String(s) => out.push(s),
                    Value::Mapping(map) => out.extend(map.values().filter_map(Value::as_str)),
                    _ => {}
                }
            }
        }
        Value::Mapping(map) => out.extend(map.values().filter_map(Value::as_str)),
        _ => {}
    }
}

/// File stem of a reference path
fn reference_stem(reference: &str) -> &str {
    let name = reference.rsplit('/').next().unwrap_or(reference);
    name.split_once('.').map_or(name, |(stem, _)| stem)
}

/// `durationHours` / `intro-to-kql` -> `Duration hours` / `Intro to kql`
fn humanize(s: &str) -> String {
    let mut words = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        match c {
            '-' | '_' => words.push(' '),
            c if c.is_uppercase() && i > 0 => {
                words.push(' ');
                words.extend(c.to_lowercase());
            }
            c => words.push(c),
        }
    }
    capitalize(words.trim())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::FsContentStore;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (TempDir, LearnSite) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        write(
            &content,
            "instructors/ada-lovelace.md",
            "---\nfirstName: Ada\nlastName: Lovelace\nbio: Wrote the **first** program.\nexpertise:\n  - Analysis\n---\n",
        );
        write(
            &content,
            "modules/foundations/networking.mdx",
            "---\nname: Networking Basics\ninstructor: content/instructors/ada-lovelace.md\ndescription: Packets and *ports*.\ndifficulty: beginner\ndurationHours: 4\n---\n",
        );
        write(
            &content,
            "lessons/foundations/tcp.mdx",
            "---\nname: TCP\nmodule: content/modules/foundations/networking.mdx\norder: 2\n---\n\n# Handshake\n",
        );
        write(
            &content,
            "lessons/foundations/ip.mdx",
            "---\nname: IP\nmodule: content/modules/foundations/networking.mdx\norder: 1\n---\n\nAddresses\n",
        );
        write(
            &content,
            "labs/scanning.mdx",
            "---\nname: Port Scanning\ntopic: content/topics/recon.md\nflags:\n  - name: Open port\n    flagValue: FLAG{secret}\n    points: 50\n---\n",
        );
        write(
            &content,
            "tracks/blue-team.mdx",
            "---\nname: Blue Team\nsteps:\n  - order: 2\n    lab: content/labs/scanning.mdx\n  - order: 1\n    name: Start here\n    module: content/modules/foundations/networking.mdx\n---\n",
        );

        let config = SiteConfig {
            page_size: 1,
            ..Default::default()
        };
        let site = LearnSite::with_config(dir.path(), config);
        (dir, site)
    }

    fn read(site: &LearnSite, url_path: &str) -> String {
        fs::read_to_string(output_path(&site.public_dir, url_path)).unwrap()
    }

    #[tokio::test]
    async fn test_generate_site() {
        let (_dir, site) = fixture();
        let store = FsContentStore::new(&site.content_dir, site.config.page_size);
        let report = Generator::new(&site, &store)
            .unwrap()
            .generate()
            .await
            .unwrap();

        assert_eq!(report.len(), 6);
        assert_eq!(report.count(ContentType::Lesson), 2);
        assert_eq!(report.count(ContentType::Page), 0);

        let instructor = read(&site, "/instructors/ada-lovelace/");
        assert!(instructor.contains("Ada Lovelace"));
        assert!(instructor.contains("<strong>first</strong>"));
        assert!(instructor.contains(r#"<a href="/modules/foundations/networking/">Networking Basics</a>"#));

        let module = read(&site, "/modules/foundations/networking/");
        let ip = module.find("/lessons/foundations/ip/").unwrap();
        let tcp = module.find("/lessons/foundations/tcp/").unwrap();
        assert!(ip < tcp);
        assert!(module.contains("4 h"));

        let lab = read(&site, "/labs/scanning/");
        assert!(lab.contains("Open port"));
        assert!(!lab.contains("FLAG{secret}"));
        assert!(lab.contains("Recon"));

        let track = read(&site, "/tracks/blue-team/");
        let first = track.find("Start here").unwrap();
        let second = track.find("Port Scanning").unwrap();
        assert!(first < second);

        assert!(read(&site, "/").contains("Networking Basics"));
        assert!(read(&site, "/labs/").contains("/labs/scanning/"));
        assert!(read(&site, "/404.html").contains("Page not found"));
        assert!(read(&site, "/routes.json").contains("http://localhost:4000/lessons/foundations/tcp/"));
    }

    #[tokio::test]
    async fn test_home_page_document_replaces_overview() {
        let (dir, site) = fixture();
        write(
            &dir.path().join("content"),
            "pages/home.mdx",
            "---\ntitle: Welcome\nblocks:\n  - _template: hero\n    headline: Train like you fight\n---\n",
        );
        let store = FsContentStore::new(&site.content_dir, 10);
        let report = Generator::new(&site, &store)
            .unwrap()
            .generate()
            .await
            .unwrap();

        assert_eq!(report.count(ContentType::Page), 1);
        let home = read(&site, "/");
        assert!(home.contains("Train like you fight"));
        assert!(!home.contains(r#"class="home""#));
    }

    #[tokio::test]
    async fn test_broken_document_fails_build() {
        let (dir, site) = fixture();
        write(&dir.path().join("content"), "labs/broken.mdx", "---\nname: [\n---\n");
        let store = FsContentStore::new(&site.content_dir, 10);
        let result = Generator::new(&site, &store).unwrap().generate().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_page_shadowing_other_routes_fails_build() {
        let cases = [
            ("pages/labs.mdx", "/labs/"),
            ("pages/labs/scanning.mdx", "/labs/scanning/"),
        ];
        for (page, shadowed) in cases {
            let (dir, site) = fixture();
            write(&dir.path().join("content"), page, "---\ntitle: Shadow\n---\n");
            let store = FsContentStore::new(&site.content_dir, 10);

            let err = Generator::new(&site, &store)
                .unwrap()
                .generate()
                .await
                .unwrap_err();
            assert!(err.to_string().contains(shadowed), "{}", err);
            assert!(!site.public_dir.exists());
        }
    }

    #[test]
    fn test_output_path() {
        let public = std::path::Path::new("public");
        assert_eq!(output_path(public, "/"), public.join("index.html"));
        assert_eq!(
            output_path(public, "/labs/a/"),
            public.join("labs/a/").join("index.html")
        );
        assert_eq!(output_path(public, "/404.html"), public.join("404.html"));
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("durationHours"), "Duration hours");
        assert_eq!(humanize("intro-to-kql"), "Intro to kql");
        assert_eq!(reference_stem("content/topics/recon.md"), "recon");
    }
}
