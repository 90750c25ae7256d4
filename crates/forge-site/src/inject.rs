//! Placeholder injection into page markup.
//!
//! Pages carry empty elements such as `<div id="navbar-placeholder"></div>`
//! where shared fragments belong. [`inject`] fills the first such element;
//! the placeholder element itself is kept so styling hooks on it still apply.

use std::sync::LazyLock;

use regex::Regex;

/// Script tag that loads fragments in the browser. Its fragment loading is
/// redundant once every placeholder is filled at build time, but the same
/// script sets up the mobile menu and dropdowns.
static LOADER_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[ \t]*<script\s+src=["'](?:\./|(?:\.\./)+)?js/components\.js["']\s*>\s*</script>[ \t]*\r?\n?"#)
        .unwrap()
});

/// Replace the content of the first element whose `id` is `placeholder_id`.
///
/// Returns `None` when no such element exists or its closing tag is missing.
/// Elements nested inside the placeholder with the same tag name are counted,
/// so the matching closing tag is found rather than the first one.
pub fn inject(html: &str, placeholder_id: &str, markup: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let (tag_start, open_end, self_closing) = find_placeholder(html, placeholder_id)?;

    let name_end = lower[tag_start + 1..]
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .map(|i| tag_start + 1 + i)?;
    let tag_name = &lower[tag_start + 1..name_end];

    if self_closing {
        let open_tag = html[tag_start..open_end - 2].trim_end();
        return Some(format!(
            "{}{open_tag}>{markup}</{}>{}",
            &html[..tag_start],
            &html[tag_start + 1..name_end],
            &html[open_end..]
        ));
    }

    let close_start = find_closing_tag(&lower, open_end, tag_name)?;
    Some(format!("{}{markup}{}", &html[..open_end], &html[close_start..]))
}

/// Remove the client-side fragment loader script.
///
/// Only safe when the page gets its menu behavior from elsewhere.
pub fn strip_loader_script(html: &str) -> String {
    LOADER_SCRIPT.replace_all(html, "").into_owned()
}

/// Locate the opening tag carrying `id="<placeholder_id>"` or
/// `id='<placeholder_id>'`, whichever comes first outside comments.
///
/// Returns the offset of its `<`, the offset just past its `>`, and whether it
/// is self-closing.
fn find_placeholder(html: &str, placeholder_id: &str) -> Option<(usize, usize, bool)> {
    let needles = [
        format!("id=\"{placeholder_id}\""),
        format!("id='{placeholder_id}'"),
    ];
    let mut from = 0;

    loop {
        let (pos, len) = needles
            .iter()
            .filter_map(|n| html[from..].find(n.as_str()).map(|i| (from + i, n.len())))
            .min_by_key(|&(pos, _)| pos)?;
        from = pos + len;

        // `data-id="..."` and friends are not the id attribute.
        let preceded_by_space = html[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace());
        if !preceded_by_space || in_comment(html, pos) {
            continue;
        }

        let Some(tag_start) = html[..pos].rfind('<') else {
            continue;
        };
        if html[tag_start..pos].contains('>') {
            continue;
        }
        let open_end = html[from..].find('>').map(|i| from + i + 1)?;
        let self_closing = html[..open_end - 1].ends_with('/');
        return Some((tag_start, open_end, self_closing));
    }
}

/// Whether `pos` falls inside an unterminated `<!--` before it.
fn in_comment(html: &str, pos: usize) -> bool {
    html[..pos]
        .rfind("<!--")
        .is_some_and(|start| !html[start..pos].contains("-->"))
}

/// Offset of the `</tag>` that closes an element whose content starts at
/// `from`, skipping nested elements of the same name.
fn find_closing_tag(lower: &str, from: usize, tag_name: &str) -> Option<usize> {
    let open = format!("<{tag_name}");
    let close = format!("</{tag_name}");
    let mut depth = 0usize;
    let mut pos = from;

    loop {
        let next_close = find_tag(lower, pos, &close)?;
        match find_tag(lower, pos, &open) {
            Some(next_open) if next_open < next_close => {
                let end = lower[next_open..].find('>').map(|i| next_open + i)?;
                if !lower[..end].ends_with('/') {
                    depth += 1;
                }
                pos = end + 1;
            }
            _ => {
                if depth == 0 {
                    return Some(next_close);
                }
                depth -= 1;
                pos = next_close + close.len();
            }
        }
    }
}

/// Find `needle` (`<div`, `</div`) as a whole tag name at or after `from`.
fn find_tag(lower: &str, from: usize, needle: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(i) = lower[pos..].find(needle) {
        let at = pos + i;
        let after = lower[at + needle.len()..].chars().next();
        if after.is_none_or(|c| c.is_ascii_whitespace() || c == '>' || c == '/') {
            return Some(at);
        }
        pos = at + needle.len();
    }
    None
}
