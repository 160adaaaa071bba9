use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use walkdir::{DirEntry, WalkDir};

use crate::config::SiteConfig;
use crate::content::page::{Page, PageKind};
use crate::error::{IndexError, Result};

/// Labels of a top-level section (or of the home page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub short: Option<String>,
}

impl Section {
    fn from_page(page: &Page) -> Result<Self> {
        Ok(Self {
            title: page.title.clone(),
            short: page.param_str("short")?.map(str::to_string),
        })
    }
}

/// The published pages of a site plus the section labels they refer to.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    pages: Vec<Page>,
    sections: HashMap<String, Section>,
    home: Section,
}

impl Site {
    /// Load every content file under the configured content directory.
    pub fn load(site_root: &Path, config: SiteConfig) -> Result<Self> {
        Self::load_at(site_root, config, Utc::now())
    }

    /// Like [`Site::load`], judging publish and expiry dates against `now`.
    pub fn load_at(site_root: &Path, config: SiteConfig, now: DateTime<Utc>) -> Result<Self> {
        let content_dir = config.content_path(site_root);
        let pages = load_pages(&content_dir, &config)?;
        Self::from_pages(config, pages, now)
    }

    /// Build a site from already parsed pages, keeping those published at
    /// `now` in their given order.
    ///
    /// Section pages contribute their labels even when they are not
    /// published themselves.
    pub fn from_pages(config: SiteConfig, pages: Vec<Page>, now: DateTime<Utc>) -> Result<Self> {
        let mut sections = HashMap::new();
        let mut home = Section {
            title: config.title.clone(),
            short: None,
        };

        for page in &pages {
            match (page.kind, page.section.as_deref()) {
                (PageKind::Home, _) => home = Section::from_page(page)?,
                (PageKind::Section, Some(dir)) if page.path.matches('/').count() == 1 => {
                    sections.insert(dir.to_string(), Section::from_page(page)?);
                }
                _ => {}
            }
        }

        for dir in pages.iter().filter_map(|p| p.section.as_deref()) {
            if !sections.contains_key(dir) {
                sections.insert(
                    dir.to_string(),
                    Section {
                        title: config.title_case_style.apply(&dir.replace(['-', '_'], " ")),
                        short: None,
                    },
                );
            }
        }

        let total = pages.len();
        let mut published = Vec::with_capacity(total);
        for page in pages {
            if page.is_published(now, &config)? {
                published.push(page);
            } else {
                tracing::debug!("Excluding unpublished page '{}'", page.path);
            }
        }

        tracing::info!(
            "Site has {} published pages ({} excluded)",
            published.len(),
            total - published.len()
        );

        Ok(Self {
            config,
            pages: published,
            sections,
            home,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Published pages in traversal order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The top-level section a page belongs to; pages at the content root
    /// belong to the home page.
    pub fn first_section(&self, page: &Page) -> &Section {
        page.section
            .as_deref()
            .and_then(|dir| self.sections.get(dir))
            .unwrap_or(&self.home)
    }
}

/// Parse all markdown files under `content_dir`, sorted by path.
fn load_pages(content_dir: &Path, config: &SiteConfig) -> Result<Vec<Page>> {
    if !content_dir.is_dir() {
        return Err(IndexError::Config(format!(
            "content directory '{}' not found",
            content_dir.display()
        )));
    }

    let mut pages = Vec::new();
    let walker = WalkDir::new(content_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(content_dir).to_path_buf();
            IndexError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(content_dir)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let source = std::fs::read_to_string(entry.path())
            .map_err(|e| IndexError::io(entry.path(), e))?;

        tracing::debug!("Loading page '{}'", relative);
        pages.push(Page::from_source(&relative, &source, config)?);
    }

    Ok(pages)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn page(path: &str, source: &str) -> Page {
        Page::from_source(path, source, &SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_from_pages_excludes_drafts() {
        let pages = vec![
            page("a.md", "---\ntitle: A\n---\n"),
            page("b.md", "---\ntitle: B\ndraft: true\n---\n"),
        ];
        let site = Site::from_pages(SiteConfig::default(), pages, Utc::now()).unwrap();
        let titles: Vec<_> = site.pages().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[test]
    fn test_first_section_uses_top_level_index() {
        let pages = vec![
            page("docs/_index.md", "---\ntitle: Documentation\nshort: Docs\n---\n"),
            page("docs/reference/_index.md", "---\ntitle: Reference\n---\n"),
            page("docs/reference/config.md", "---\ntitle: Config\n---\n"),
        ];
        let site = Site::from_pages(SiteConfig::default(), pages, Utc::now()).unwrap();
        let section = site.first_section(&site.pages()[2]);
        assert_eq!(section.title, "Documentation");
        assert_eq!(section.short.as_deref(), Some("Docs"));
    }

    #[test]
    fn test_draft_section_still_labels_children() {
        let pages = vec![
            page("guides/_index.md", "---\ntitle: Guides\ndraft: true\n---\n"),
            page("guides/setup.md", "---\ntitle: Setup\n---\n"),
        ];
        let site = Site::from_pages(SiteConfig::default(), pages, Utc::now()).unwrap();
        assert_eq!(site.pages().len(), 1);
        assert_eq!(site.first_section(&site.pages()[0]).title, "Guides");
    }

    #[test]
    fn test_missing_section_index_is_synthesized() {
        let pages = vec![page("highlights/new-buffers.md", "---\ntitle: New buffers\n---\n")];
        let site = Site::from_pages(SiteConfig::default(), pages, Utc::now()).unwrap();
        assert_eq!(site.first_section(&site.pages()[0]).title, "Highlights");
    }

    #[test]
    fn test_root_pages_belong_to_home() {
        let mut config = SiteConfig::default();
        config.title = "Vector".into();
        let pages = vec![page("community.md", "---\ntitle: Community\n---\n")];
        let site = Site::from_pages(config, pages, Utc::now()).unwrap();
        assert_eq!(site.first_section(&site.pages()[0]).title, "Vector");
    }

    #[test]
    fn test_load_walks_content_tree() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("docs/sinks")).unwrap();
        fs::create_dir_all(content.join(".git")).unwrap();
        fs::write(content.join("_index.md"), "---\ntitle: Home\n---\n").unwrap();
        fs::write(content.join("docs/_index.md"), "---\ntitle: Docs\n---\n").unwrap();
        fs::write(content.join("docs/sinks/console.md"), "---\ntitle: Console\n---\n").unwrap();
        fs::write(content.join("docs/sinks/diagram.svg"), "<svg/>").unwrap();
        fs::write(content.join(".git/notes.md"), "---\ntitle: Hidden\n---\n").unwrap();

        let site = Site::load(dir.path(), SiteConfig::default()).unwrap();
        let paths: Vec<_> = site.pages().iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["_index.md", "docs/_index.md", "docs/sinks/console.md"]);
    }

    #[test]
    fn test_load_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = Site::load(dir.path(), SiteConfig::default()).unwrap_err();
        assert!(matches!(err, IndexError::Config(_)));
    }

    #[test]
    fn test_load_reports_front_matter_errors() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(content.join("bad.md"), "---\ntitle: [oops\n---\n").unwrap();

        let err = Site::load(dir.path(), SiteConfig::default()).unwrap_err();
        assert!(matches!(err, IndexError::FrontMatter { .. }));
    }
}
