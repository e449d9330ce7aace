//! HTML rendering.
//!
//! Pure functions from an [`Aggregate`] to a page.  Nothing here fetches or
//! touches the cache, so layout changes never affect caching behaviour.
//!
//! * One `<h2>` per source that has entries, in configuration order.
//! * One link per entry: `link` is the anchor target, `title` the text.
//! * Every interpolated string is HTML-escaped.

use std::fmt::Write;

use crate::cache::Aggregate;

const PAGE_TITLE: &str = "Top Posts of the Week";

const STYLE: &str = "body{font-family:Arial,sans-serif;background:#000;color:#fff;text-align:center;padding:20px}\
.container{background:#1e1e1e;padding:20px;border-radius:8px;box-shadow:0 2px 10px rgba(0,0,0,.5);width:80%;max-width:800px;margin:0 auto}\
h1{font-size:2em;margin-bottom:20px}\
h2{font-size:1.5em;margin-top:20px;color:#fc0}\
.post{margin:10px 0;font-size:1.1em}\
a{color:#0f0;text-decoration:none}\
a:hover{text-decoration:underline}";

/// Render the full page for a non-empty aggregate.
pub fn page(aggregate: &Aggregate) -> String {
    let mut body = String::new();

    for (name, result) in aggregate.iter() {
        if result.is_empty() {
            continue;
        }
        // Writing into a String cannot fail.
        let _ = write!(body, "<h2>{}</h2>", escape(&heading(name)));
        for entry in result.entries() {
            let _ = write!(
                body,
                r#"<div class="post"><a href="{}" target="_blank" rel="noopener">{}</a></div>"#,
                escape(&entry.link),
                escape(&entry.title)
            );
        }
    }

    document(&body)
}

/// The page shown when no source produced any entries.
pub fn no_content_page() -> String {
    document(r#"<p class="post">No content available right now. Please try again later.</p>"#)
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{PAGE_TITLE}</title>\
<style>{STYLE}</style></head><body><div class=\"container\"><h1>{PAGE_TITLE}</h1>{body}</div></body></html>"
    )
}

/// Source name with the first character upper-cased and the rest lower-cased
/// (`"nba"` -> `"Nba"`, `"PanIslamistPosting"` -> `"Panislamistposting"`).
fn heading(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
