//! Low-level HTML helpers for wiki launch tables.
//!
//! These are naive string scanners tailored to MediaWiki table
//! output. Tag names are matched case-insensitively on ASCII.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static REFERENCE_SUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<sup[^>]*class="[^"]*reference[^"]*"[^>]*>.*?</sup>"#).unwrap());
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").unwrap());

/// Inner HTML of every `<table>` whose class list contains `wikitable`.
///
/// Nested tables are kept inside their parent's slice.
pub fn wikitables(markup: &str) -> Vec<&str> {
    let lc = to_lowercase_fast(markup);
    let mut tables = Vec::new();
    let mut from = 0;

    while let Some(start) = find_open_tag(&lc, "table", from) {
        let Some(open_end) = lc[start..].find('>').map(|i| start + i + 1) else {
            break;
        };

        let close = matching_close(&lc, "table", open_end).unwrap_or(lc.len());
        if lc[start..open_end].contains("wikitable") {
            tables.push(&markup[open_end..close]);
            // Skip past the whole table so nested tables aren't reported twice
            from = close;
        } else {
            from = open_end;
        }
    }

    tables
}

/// Inner HTML of each `<tr>` in a table body.
///
/// A row ends at `</tr>`, at the next `<tr>`, or at the end of the table.
pub fn rows(table: &str) -> Vec<&str> {
    blocks(table, "tr", &["tr"])
}

/// Inner HTML of each `<td>` cell in a row. Header `<th>` cells are skipped.
pub fn data_cells(row: &str) -> Vec<&str> {
    blocks(row, "td", &["td", "th"])
}

/// Plain text of a cell.
///
/// Footnote superscripts and style blocks are removed, tags are replaced
/// by `separator`, entities decoded and whitespace collapsed.
pub fn cell_text(inner: &str, separator: &str) -> String {
    let without_refs = REFERENCE_SUP.replace_all(inner, "");
    let without_style = STYLE_BLOCK.replace_all(&without_refs, "");
    let with_breaks = LINE_BREAK.replace_all(&without_style, " ");
    let stripped = strip_tags(&with_breaks, separator);
    normalize_ws(&decode_entities(&stripped))
}

/// Collect `<tag>` blocks, ending each at its close tag or the next opener in `enders`.
fn blocks<'a>(s: &'a str, tag: &str, enders: &[&str]) -> Vec<&'a str> {
    let lc = to_lowercase_fast(s);
    let close = format!("</{}", tag);
    let mut out = Vec::new();
    let mut from = 0;

    while let Some(start) = find_open_tag(&lc, tag, from) {
        let Some(open_end) = lc[start..].find('>').map(|i| start + i + 1) else {
            break;
        };

        let explicit = lc[open_end..].find(&close).map(|i| open_end + i);
        let implicit = enders
            .iter()
            .filter_map(|t| find_open_tag(&lc, t, open_end))
            .min();

        let end = match (explicit, implicit) {
            (Some(e), Some(i)) => e.min(i),
            (Some(e), None) => e,
            (None, Some(i)) => i,
            (None, None) => lc.len(),
        };

        out.push(&s[open_end..end]);
        from = end;
    }

    out
}

/// Position of the next `<tag` that is a real opening tag (not `<tag-foo` or `<tags`).
fn find_open_tag(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = format!("<{}", tag);
    let mut pos = from;

    while let Some(rel) = lc.get(pos..)?.find(&pat) {
        let start = pos + rel;
        let next = lc[start + pat.len()..].chars().next();
        match next {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return Some(start),
            None => return None,
            _ => pos = start + pat.len(),
        }
    }

    None
}

/// Index of the `</tag` closing the element opened just before `from`, honouring nesting.
fn matching_close(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let close = format!("</{}", tag);
    let mut depth = 1usize;
    let mut pos = from;

    loop {
        let next_close = lc[pos..].find(&close).map(|i| pos + i)?;
        match find_open_tag(lc, tag, pos) {
            Some(open) if open < next_close => {
                depth += 1;
                pos = open + 1;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                pos = next_close + close.len();
            }
        }
    }
}

/// Remove all `<...>` tags, putting `separator` where each one stood.
fn strip_tags(s: &str, separator: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push_str(separator);
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decode the named entities wiki tables use plus any numeric entity.
pub fn decode_entities(s: &str) -> String {
    let named = s
        .replace("&nbsp;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&minus;", "-")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");

    let numeric = NUMERIC_ENTITY.replace_all(&named, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(|c| if c == '\u{a0}' { ' ' } else { c })
            .map(String::from)
            .unwrap_or_default()
    });

    // Last, so "&amp;nbsp;" stays literal
    numeric.replace("&amp;", "&")
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Fast ASCII-only lowercasing; byte offsets stay aligned with the input.
fn to_lowercase_fast(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}
