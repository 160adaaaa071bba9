use std::collections::HashMap;

use serde_json::Value;

use crate::content::page::Page;
use crate::content::site::Site;
use crate::error::{IndexError, Result};
use crate::rendering::markdown::MarkupRenderer;
use crate::search::record::PageRecord;

/// Layout of pages documenting a single source, transform or sink.
pub const COMPONENT_LAYOUT: &str = "component";

/// Section label shared by all component pages.
pub const COMPONENT_SECTION: &str = "Component";

/// Build the search records of every published page of `site`.
///
/// Records follow the site's page order. The first failing page aborts the
/// whole pass so a partial index is never produced.
pub fn build_index(site: &Site, renderer: &dyn MarkupRenderer) -> Result<Vec<PageRecord>> {
    let mut records = Vec::with_capacity(site.pages().len());
    let mut seen: HashMap<String, String> = HashMap::new();

    for page in site.pages() {
        if page.draft {
            tracing::debug!("Skipping draft page '{}'", page.path);
            continue;
        }

        let record = build_record(site, page, renderer).map_err(|e| e.in_page(&page.path))?;

        if let Some(first) = seen.insert(record.object_id.clone(), page.path.clone()) {
            return Err(IndexError::DuplicateObjectId {
                id: record.object_id,
                first,
                second: page.path.clone(),
            });
        }

        records.push(record);
    }

    tracing::info!("Built search index with {} records", records.len());
    Ok(records)
}

/// Derive the search record of a single page.
pub fn build_record(site: &Site, page: &Page, renderer: &dyn MarkupRenderer) -> Result<PageRecord> {
    let is_component = page.is_layout(COMPONENT_LAYOUT);

    let mut title = renderer.plainify(raw_title(page)?)?;
    if title.is_empty() {
        return Err(missing_field(page, "title"));
    }
    if is_component {
        match page.param_str("kind")? {
            Some(kind) => title = format!("{title} {kind}"),
            None => tracing::warn!("Component page '{}' has no kind", page.path),
        }
    }

    let section = if is_component {
        COMPONENT_SECTION.to_string()
    } else {
        let first = site.first_section(page);
        let label = first.short.as_deref().unwrap_or(first.title.as_str());
        site.config().title_case_style.apply(label)
    };

    let summary = match page.param_str("summary")? {
        Some(summary) => renderer.plainify(summary)?,
        None => renderer.summarize(&page.body)?,
    };

    let description = match page.param_str("description")? {
        Some(description) => renderer.plainify(description)?,
        None => String::new(),
    };

    Ok(PageRecord {
        object_id: page.unique_id.clone(),
        title,
        tags: tags(page)?,
        content: renderer.plainify(&page.body)?,
        section,
        summary,
        description,
        url: page.rel_permalink.clone(),
    })
}

/// `search_title`, then `short`, then the page title.
fn raw_title(page: &Page) -> Result<&str> {
    if let Some(title) = page.param_str("search_title")? {
        return Ok(title);
    }
    if let Some(short) = page.param_str("short")? {
        return Ok(short);
    }
    if !page.title.trim().is_empty() {
        return Ok(page.title.as_str());
    }
    Err(missing_field(page, "title"))
}

/// Tags as a list; a single string counts as one tag.
fn tags(page: &Page) -> Result<Vec<String>> {
    match page.param("tags") {
        None => Ok(Vec::new()),
        Some(Value::String(tag)) if tag.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(tag)) => Ok(vec![tag.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(tag) => Ok(tag.clone()),
                other => Err(page.invalid_param("tags", format!("expected string tags, found {other}"))),
            })
            .collect(),
        Some(other) => Err(page.invalid_param("tags", format!("expected a list, found {other}"))),
    }
}

fn missing_field(page: &Page, field: &str) -> IndexError {
    IndexError::MissingField {
        page: page.path.clone(),
        field: field.to_string(),
    }
}
