use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::rendering::shortcodes::strip_shortcodes;

/// Marker separating a hand-picked summary from the rest of the body.
pub const SUMMARY_DIVIDER: &str = "<!--more-->";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid tag pattern"));

/// Converts page markup into the plain text stored in the search index.
///
/// Implementations must fail rather than return partially converted text.
#[cfg_attr(test, mockall::automock)]
pub trait MarkupRenderer {
    /// Render markup and strip it down to plain text.
    fn plainify(&self, markup: &str) -> Result<String>;

    /// Derive the automatic summary of a page body.
    fn summarize(&self, markup: &str) -> Result<String>;
}

/// Markdown renderer with Hugo's plain-text and summary rules.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    summary_length: usize,
}

impl MarkdownRenderer {
    pub fn new(summary_length: usize) -> Self {
        Self { summary_length }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.summary_length)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(70)
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn plainify(&self, markup: &str) -> Result<String> {
        let source = strip_shortcodes(markup)?;
        Ok(markdown_to_text(&source, false).text)
    }

    /// The text before `<!--more-->` when the divider is present, otherwise
    /// the first `summary_length` words extended to the end of their
    /// sentence.
    fn summarize(&self, markup: &str) -> Result<String> {
        let source = strip_shortcodes(markup)?;
        let extracted = markdown_to_text(&source, true);

        if extracted.divided {
            return Ok(extracted.text);
        }

        Ok(truncate_to_whole_sentence(&extracted.text, self.summary_length))
    }
}

struct Extracted {
    text: String,
    /// Extraction stopped at a summary divider.
    divided: bool,
}

/// Walk the markdown events and keep only the readable text.
///
/// Block ends become spaces so adjacent paragraphs, list items and table
/// cells don't run together; raw HTML is reduced to its text content.
/// With `stop_at_divider` the walk ends at the first `<!--more-->` found
/// in raw HTML, so a divider quoted inside a code block never counts.
fn markdown_to_text(markdown: &str, stop_at_divider: bool) -> Extracted {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION;

    let parser = Parser::new_ext(markdown, options);
    let mut text = String::new();
    // HTML blocks arrive one line per event; tags and comments may span lines.
    let mut html_block: Option<String> = None;

    for event in parser {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
            Event::Html(html) => {
                let block = html_block.get_or_insert_with(String::new);
                block.push_str(&html);
                if stop_at_divider {
                    if let Some((before, _)) = block.split_once(SUMMARY_DIVIDER) {
                        text.push_str(&html_to_text(before));
                        return Extracted::divided(&text);
                    }
                }
            }
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(block) = html_block.take() {
                    text.push_str(&html_to_text(&block));
                }
                text.push(' ');
            }
            Event::InlineHtml(html) => {
                if stop_at_divider {
                    if let Some((before, _)) = html.split_once(SUMMARY_DIVIDER) {
                        text.push_str(&html_to_text(before));
                        return Extracted::divided(&text);
                    }
                }
                text.push_str(&html_to_text(&html));
            }
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(end) if is_block_end(&end) => text.push(' '),
            _ => {}
        }
    }

    if let Some(block) = html_block {
        text.push_str(&html_to_text(&block));
    }

    Extracted {
        text: collapse_whitespace(&text),
        divided: false,
    }
}

impl Extracted {
    fn divided(text: &str) -> Self {
        Self {
            text: collapse_whitespace(text),
            divided: true,
        }
    }
}

fn is_block_end(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::CodeBlock
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::FootnoteDefinition
            | TagEnd::Table
            | TagEnd::TableHead
            | TagEnd::TableRow
            | TagEnd::TableCell
    )
}

/// Text content of a raw HTML fragment, entities decoded.
fn html_to_text(html: &str) -> String {
    let stripped = HTML_TAG.replace_all(html, " ");
    html_escape::decode_html_entities(&stripped).into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_to_whole_sentence(text: &str, max_words: usize) -> String {
    let mut words = Vec::new();

    for word in text.split_whitespace() {
        words.push(word);
        if words.len() >= max_words && ends_sentence(word) {
            break;
        }
    }

    words.join(" ")
}

fn ends_sentence(word: &str) -> bool {
    word.ends_with(['.', '!', '?'])
}
