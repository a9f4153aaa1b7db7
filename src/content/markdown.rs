//! Markdown/MDX rendering with syntax highlighting

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::escape_html;

lazy_static! {
    static ref MDX_ESM: Regex = Regex::new(r"(?m)^(import|export)\s.*$").unwrap();
    static ref VIDEO_EMBED: Regex = Regex::new(r"<VideoEmbed\b([^>]*?)/>").unwrap();
    static ref CODE_BLOCK: Regex = Regex::new(r"<CodeBlock\b([^>]*?)/>").unwrap();
    static ref CALLOUT: Regex =
        Regex::new(r"(?s)<Callout\b([^>]*?)(?:/>|>(.*?)</Callout>)").unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(r#"(\w+)=(?:"([^"]*)"|\{"([^"]*)"\})"#).unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render markdown or MDX to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let source = expand_mdx(markdown);

        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(&source, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            if let Some((lang, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) if self.highlight => {
                    let lang = match kind {
                        // Info strings like `rust,ignore` or `bash title=x`
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                            lang.split([',', ' ']).next().map(str::to_string)
                        }
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted =
            theme.and_then(|t| highlighted_html_for_string(code, &self.syntax_set, syntax, t).ok());

        match highlighted {
            Some(html) if self.line_numbers => self.add_line_numbers(&html, lang),
            Some(html) => format!(r#"<figure class="highlight {}">{}</figure>"#, lang, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                escape_html(code)
            ),
        }
    }

    /// Add a line-number gutter to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let gutter: Vec<String> = (1..=code.lines().count())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect();

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang,
            gutter.join("\n"),
            code
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the MDX components used by lesson bodies with plain markdown/HTML
/// and drop ESM `import`/`export` lines.
pub fn expand_mdx(source: &str) -> String {
    let source = MDX_ESM.replace_all(source, "");

    let source = VIDEO_EMBED.replace_all(&source, |caps: &Captures| {
        let attrs = attributes(&caps[1]);
        let url = attrs.get("url").map(String::as_str).unwrap_or_default();
        let caption = attrs
            .get("caption")
            .map(|c| format!("<figcaption>{}</figcaption>", escape_html(c)))
            .unwrap_or_default();
        format!(
            "\n\n<figure class=\"video-embed\"><iframe src=\"{}\" allowfullscreen loading=\"lazy\"></iframe>{}</figure>\n\n",
            escape_html(&embed_url(url)),
            caption
        )
    });

    let source = CODE_BLOCK.replace_all(&source, |caps: &Captures| {
        let attrs = attributes(&caps[1]);
        let language = attrs.get("language").map(String::as_str).unwrap_or_default();
        let code = attrs.get("code").map(String::as_str).unwrap_or_default();
        format!("\n\n```{}\n{}\n```\n\n", language, code.replace("\\n", "\n"))
    });

    let source = CALLOUT.replace_all(&source, |caps: &Captures| {
        let attrs = attributes(&caps[1]);
        let kind = attrs.get("type").map(String::as_str).unwrap_or("info");
        let title = attrs
            .get("title")
            .map(|t| format!("<p class=\"callout-title\">{}</p>\n\n", escape_html(t)))
            .unwrap_or_default();
        let content = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .or_else(|| attrs.get("content").cloned())
            .unwrap_or_default();
        format!(
            "\n\n<aside class=\"callout callout-{}\">\n\n{}{}\n\n</aside>\n\n",
            escape_html(kind),
            title,
            content
        )
    });

    source.into_owned()
}

/// Parse `key="value"` and `key={"value"}` JSX attributes
fn attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

/// Turn a YouTube watch link into its embeddable form
fn embed_url(url: &str) -> String {
    if let Some(id) = url
        .strip_prefix("https://www.youtube.com/watch?v=")
        .or_else(|| url.strip_prefix("https://youtube.com/watch?v="))
    {
        let id = id.split('&').next().unwrap_or(id);
        return format!("https://www.youtube.com/embed/{}", id);
    }
    if let Some(id) = url.strip_prefix("https://youtu.be/") {
        return format!("https://www.youtube.com/embed/{}", id);
    }
    url.to_string()
}
