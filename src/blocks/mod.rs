//! Page builder blocks
//!
//! Marketing pages carry an ordered `blocks` list in their front-matter. Each
//! entry names its template in `_template`; the renderer turns every block
//! into one HTML section, in order. Templates it does not know render nothing.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt::Write;

use crate::config::SiteConfig;
use crate::content::{Document, MarkdownRenderer};
use crate::helpers::{escape_html, image_tag, link_to, url_for};

/// One section of a block-built page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "_template", rename_all = "lowercase")]
pub enum Block {
    Hero(HeroBlock),
    Callout(CalloutBlock),
    Stats(StatsBlock),
    Cta(CtaBlock),
    Content(ContentBlock),
    Video(VideoBlock),
    #[serde(other)]
    Unknown,
}

impl Block {
    pub fn name(&self) -> &'static str {
        match self {
            Block::Hero(_) => "hero",
            Block::Callout(_) => "callout",
            Block::Stats(_) => "stats",
            Block::Cta(_) => "cta",
            Block::Content(_) => "content",
            Block::Video(_) => "video",
            Block::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Action {
    pub label: String,
    pub link: String,
    /// `button` or `link`
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Image {
    pub src: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroBlock {
    pub tagline: Option<String>,
    pub headline: Option<String>,
    /// Markdown
    pub text: Option<String>,
    pub actions: Vec<Action>,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalloutBlock {
    pub text: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Stat {
    pub stat: String,
    #[serde(rename = "type")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsBlock {
    pub title: Option<String>,
    pub description: Option<String>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CtaBlock {
    pub title: Option<String>,
    pub description: Option<String>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    /// Markdown
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VideoBlock {
    pub url: Option<String>,
    #[serde(rename = "autoPlay")]
    pub auto_play: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
}

/// Read the `blocks` list of a page, empty when absent
pub fn parse_blocks(doc: &Document) -> Result<Vec<Block>> {
    match doc.field("blocks") {
        None | Some(serde_yaml::Value::Null) => Ok(Vec::new()),
        Some(value) => serde_yaml::from_value(value.clone())
            .with_context(|| format!("Invalid blocks in {}", doc.sys.relative_path)),
    }
}

/// Renders blocks into HTML sections
pub struct BlockRenderer<'a> {
    config: &'a SiteConfig,
    markdown: &'a MarkdownRenderer,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(config: &'a SiteConfig, markdown: &'a MarkdownRenderer) -> Self {
        Self { config, markdown }
    }

    /// Render every block in order
    pub fn render_all(&self, blocks: &[Block]) -> Result<String> {
        let mut html = String::new();
        for block in blocks {
            if let Some(section) = self.render(block)? {
                html.push_str(&section);
                html.push('\n');
            }
        }
        Ok(html)
    }

    /// Render one block; unknown templates produce nothing
    pub fn render(&self, block: &Block) -> Result<Option<String>> {
        let html = match block {
            Block::Hero(hero) => self.hero(hero)?,
            Block::Callout(callout) => self.callout(callout),
            Block::Stats(stats) => self.stats(stats),
            Block::Cta(cta) => self.cta(cta),
            Block::Content(content) => self.content(content)?,
            Block::Video(video) => self.video(video),
            Block::Unknown => {
                tracing::debug!("Skipping block with unknown template");
                return Ok(None);
            }
        };
        Ok(Some(html))
    }

    fn hero(&self, hero: &HeroBlock) -> Result<String> {
        let mut html = String::from(r#"<section class="block block-hero">"#);
        if let Some(tagline) = &hero.tagline {
            let _ = write!(html, r#"<p class="tagline">{}</p>"#, escape_html(tagline));
        }
        if let Some(headline) = &hero.headline {
            let _ = write!(html, "<h1>{}</h1>", escape_html(headline));
        }
        if let Some(text) = &hero.text {
            let _ = write!(html, r#"<div class="prose">{}</div>"#, self.markdown.render(text)?);
        }
        html.push_str(&self.actions(&hero.actions));
        if let Some(image) = hero.image.as_ref().filter(|i| !i.src.is_empty()) {
            html.push_str(&image_tag(self.config, &image.src, image.alt.as_deref()));
        }
        html.push_str("</section>");
        Ok(html)
    }

    fn callout(&self, callout: &CalloutBlock) -> String {
        let text = escape_html(callout.text.as_deref().unwrap_or_default());
        let inner = match &callout.url {
            Some(url) => format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(&url_for(self.config, url)),
                text
            ),
            None => text,
        };
        format!(r#"<section class="block block-callout"><p>{}</p></section>"#, inner)
    }

    fn stats(&self, stats: &StatsBlock) -> String {
        let mut html = String::from(r#"<section class="block block-stats">"#);
        if let Some(title) = &stats.title {
            let _ = write!(html, "<h2>{}</h2>", escape_html(title));
        }
        if let Some(description) = &stats.description {
            let _ = write!(html, "<p>{}</p>", escape_html(description));
        }
        html.push_str("<dl>");
        for stat in &stats.stats {
            let _ = write!(
                html,
                "<div><dt>{}</dt><dd>{}</dd></div>",
                escape_html(&stat.stat),
                escape_html(&stat.label)
            );
        }
        html.push_str("</dl></section>");
        html
    }

    fn cta(&self, cta: &CtaBlock) -> String {
        let mut html = String::from(r#"<section class="block block-cta">"#);
        if let Some(title) = &cta.title {
            let _ = write!(html, "<h2>{}</h2>", escape_html(title));
        }
        if let Some(description) = &cta.description {
            let _ = write!(html, "<p>{}</p>", escape_html(description));
        }
        html.push_str(&self.actions(&cta.actions));
        html.push_str("</section>");
        html
    }

    fn content(&self, content: &ContentBlock) -> Result<String> {
        let body = match &content.body {
            Some(body) => self.markdown.render(body)?,
            None => String::new(),
        };
        Ok(format!(
            r#"<section class="block block-content prose">{}</section>"#,
            body
        ))
    }

    fn video(&self, video: &VideoBlock) -> String {
        let Some(url) = video.url.as_deref().filter(|u| !u.is_empty()) else {
            return String::new();
        };
        let mut attrs = String::from("controls playsinline");
        if video.auto_play {
            attrs.push_str(" autoplay muted");
        }
        if video.looped {
            attrs.push_str(" loop");
        }
        format!(
            r#"<section class="block block-video"><video src="{}" {}></video></section>"#,
            escape_html(&url_for(self.config, url)),
            attrs
        )
    }

    fn actions(&self, actions: &[Action]) -> String {
        if actions.is_empty() {
            return String::new();
        }
        let links: Vec<String> = actions
            .iter()
            .filter(|a| !a.label.is_empty())
            .map(|a| {
                let kind = a.kind.as_deref().unwrap_or("button");
                format!(
                    r#"<span class="action action-{}">{}</span>"#,
                    escape_html(kind),
                    link_to(self.config, &a.link, &a.label)
                )
            })
            .collect();
        format!(r#"<div class="actions">{}</div>"#, links.join(""))
    }
}
