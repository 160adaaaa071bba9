use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::SiteConfig;
use crate::content::front_matter::{self, Params};
use crate::error::{IndexError, Result};

/// Where a page sits in the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `content/_index.md`.
    Home,
    /// `_index.md` of a directory.
    Section,
    /// Any other content file, including `index.md` leaf bundles.
    Regular,
}

/// A content page with its front matter resolved.
#[derive(Debug, Clone)]
pub struct Page {
    /// Path relative to the content directory, `/`-separated.
    pub path: String,
    pub kind: PageKind,
    /// Top-level content directory, `None` for pages at the content root.
    pub section: Option<String>,
    pub title: String,
    pub draft: bool,
    pub layout: Option<String>,
    pub params: Params,
    /// Raw markup body, front matter removed.
    pub body: String,
    pub rel_permalink: String,
    /// Stable identifier derived from `path`.
    pub unique_id: String,
}

impl Page {
    /// Build a page from a content file's source text.
    pub fn from_source(path: &str, source: &str, config: &SiteConfig) -> Result<Self> {
        let path = path.replace('\\', "/");
        let (params, body) = front_matter::split(&path, source)?;

        let (dir, file_name) = match path.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", path.as_str()),
        };
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(file_name);

        let kind = match (stem, dir.is_empty()) {
            ("_index", true) => PageKind::Home,
            ("_index", false) => PageKind::Section,
            _ => PageKind::Regular,
        };
        let section = dir
            .split('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut page = Page {
            path: path.clone(),
            kind,
            section,
            title: String::new(),
            draft: false,
            layout: None,
            params,
            body: body.to_string(),
            rel_permalink: String::new(),
            unique_id: unique_id(&path),
        };

        page.title = match page.param_str("title")? {
            Some(title) => title.to_string(),
            None => match kind {
                PageKind::Home => config.title.clone(),
                PageKind::Section => humanize(dir.rsplit('/').next().unwrap_or(dir), config),
                PageKind::Regular => String::new(),
            },
        };
        page.draft = page.param_bool("draft")?.unwrap_or(false);
        page.layout = page.param_str("layout")?.map(str::to_string);
        page.rel_permalink = page.permalink(dir, stem, config)?;

        Ok(page)
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(&key.to_lowercase()).filter(|v| !v.is_null())
    }

    /// A non-blank string parameter. Absent, null and blank values are
    /// `None`; any other type is an error.
    pub fn param_str(&self, key: &str) -> Result<Option<&str>> {
        match self.param(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid_param(key, format!("expected a string, found {other}"))),
        }
    }

    pub fn param_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.param(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid_param(key, format!("expected a boolean, found {other}"))),
        }
    }

    /// A date parameter given as RFC 3339, `YYYY-MM-DDTHH:MM:SS` or
    /// `YYYY-MM-DD` (both read as UTC).
    pub fn param_date(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.param_str(key)? else {
            return Ok(None);
        };
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Some(dt.and_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(Some(dt.and_utc()));
            }
        }

        Err(self.invalid_param(key, format!("unrecognized date '{raw}'")))
    }

    /// Whether Hugo would render this page at `now`.
    ///
    /// Drafts are never published. Future and expired pages are published
    /// only when the site enables `buildFuture` / `buildExpired`.
    pub fn is_published(&self, now: DateTime<Utc>, config: &SiteConfig) -> Result<bool> {
        if self.draft {
            return Ok(false);
        }

        if !config.build_future {
            let publish_date = match self.param_date("publishdate")? {
                Some(date) => Some(date),
                None => self.param_date("date")?,
            };
            if publish_date.is_some_and(|date| date > now) {
                return Ok(false);
            }
        }

        if !config.build_expired {
            if let Some(expiry) = self.param_date("expirydate")? {
                if expiry <= now {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    pub fn is_layout(&self, layout: &str) -> bool {
        self.layout.as_deref() == Some(layout)
    }

    fn permalink(&self, dir: &str, stem: &str, config: &SiteConfig) -> Result<String> {
        let base = config.base_path();

        if let Some(url) = self.param_str("url")? {
            return Ok(format!("{base}{}", url.trim_start_matches('/')));
        }

        let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
        if self.kind == PageKind::Regular && stem != "index" {
            segments.push(self.param_str("slug")?.unwrap_or(stem));
        }

        let mut relative: String = segments.iter().map(|s| format!("{s}/")).collect();
        relative = relative.replace(' ', "-");
        if !config.disable_path_to_lower {
            relative = relative.to_lowercase();
        }

        Ok(format!("{base}{relative}"))
    }

    pub(crate) fn invalid_param(&self, key: &str, message: String) -> IndexError {
        IndexError::InvalidParam {
            page: self.path.clone(),
            param: key.to_string(),
            message,
        }
    }
}

/// First 16 bytes of the SHA-256 of the content path, hex encoded.
fn unique_id(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

/// Title for a section directory without one (`data-model` → `Data Model`).
fn humanize(dir_name: &str, config: &SiteConfig) -> String {
    config
        .title_case_style
        .apply(&dir_name.replace(['-', '_'], " "))
}
