use crate::error::{IndexError, Result};

/// Remove Hugo shortcode tags from markdown, keeping the inner content of
/// paired shortcodes.
///
/// Handles both `{{< name args >}}` and `{{% name args %}}` forms,
/// self-closing tags (`{{< name />}}`) and the escaped comment form
/// `{{</* name */>}}`, which renders as the literal tag.
///
/// Fails on unterminated tags, nameless tags, and closing tags that have no
/// matching opener.
pub fn strip_shortcodes(markup: &str) -> Result<String> {
    let mut output = String::with_capacity(markup.len());
    let mut open: Vec<String> = Vec::new();
    let mut rest = markup;

    while let Some(start) = find_opening(rest) {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 3..];
        let (opening, closing) = if rest[start..].starts_with("{{<") {
            ("{{<", ">}}")
        } else {
            ("{{%", "%}}")
        };

        let end = after_open.find(closing).ok_or_else(|| {
            render_error(format!(
                "unterminated shortcode starting at '{}'",
                excerpt(&rest[start..])
            ))
        })?;
        let inner = after_open[..end].trim();
        rest = &after_open[end + closing.len()..];

        if let Some(comment) = inner
            .strip_prefix("/*")
            .and_then(|s| s.strip_suffix("*/"))
        {
            output.push_str(&format!("{opening} {} {closing}", comment.trim()));
            continue;
        }

        if let Some(closing_name) = inner.strip_prefix('/') {
            let name = closing_name.trim();
            match open.iter().rposition(|n| n == name) {
                Some(pos) => open.truncate(pos),
                None => {
                    return Err(render_error(format!(
                        "closing shortcode '{name}' has no matching opener"
                    )))
                }
            }
            continue;
        }

        let self_closing = inner.ends_with('/');
        let name = inner
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .ok_or_else(|| render_error("shortcode without a name".to_string()))?;

        if !self_closing {
            open.push(name.to_string());
        }
    }

    output.push_str(rest);
    Ok(output)
}

fn find_opening(s: &str) -> Option<usize> {
    match (s.find("{{<"), s.find("{{%")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn excerpt(s: &str) -> String {
    s.chars().take(40).collect()
}

fn render_error(message: String) -> IndexError {
    IndexError::Render {
        page: String::new(),
        message,
    }
}
