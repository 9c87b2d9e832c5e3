//! Fallback extraction from rendered declaration text.
//!
//! Each function looks at one feature of the flavor markup and returns `None`
//! when it is absent. Markup is scanned as plain text; only the handful of
//! class names the game system emits are recognised.

const ACTION_HEADING: &str = r#"class="action""#;
const GLYPH_MARKER: &str = r#"class="action-glyph">"#;
const SUBTITLE_MARKER: &str = r#"class="subtitle">"#;

/// Value rendered inside an action glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Actions(u32),
    Free,
    Reaction,
}

impl Glyph {
    pub fn cost(self) -> u32 {
        match self {
            Glyph::Actions(n) => n,
            Glyph::Free | Glyph::Reaction => 0,
        }
    }
}

pub fn has_action_heading(flavor: &str) -> bool {
    flavor.contains(ACTION_HEADING)
}

/// First recognised glyph in the flavor text.
pub fn glyph(flavor: &str) -> Option<Glyph> {
    flavor.match_indices(GLYPH_MARKER).find_map(|(at, marker)| {
        match flavor[at + marker.len()..].chars().next()? {
            '1' => Some(Glyph::Actions(1)),
            '2' => Some(Glyph::Actions(2)),
            '3' => Some(Glyph::Actions(3)),
            'F' => Some(Glyph::Free),
            'R' => Some(Glyph::Reaction),
            _ => None,
        }
    })
}

/// Title and optional subtitle of the action heading.
pub fn heading(flavor: &str) -> Option<(String, Option<String>)> {
    let start = flavor.find(ACTION_HEADING)?;
    let end = flavor[start..]
        .find("</h4>")
        .map_or(flavor.len(), |offset| start + offset);
    let heading = &flavor[start..end];

    let title = element_text(heading, "<strong>")?;
    if title.is_empty() {
        return None;
    }
    let subtitle = heading
        .find(SUBTITLE_MARKER)
        .map(|at| text_until_close(&heading[at + SUBTITLE_MARKER.len()..]))
        .filter(|s| !s.is_empty());
    Some((title, subtitle))
}

/// `"Raise a Shield"` -> `"raise-a-shield"`.
pub fn synthetic_slug(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Removes parentheses and surrounding whitespace from a display label.
pub fn strip_parens(label: &str) -> String {
    label.replace(['(', ')'], "").trim().to_owned()
}

/// Reads `num-actions:N` or `item:cast:actions:N`. Unparseable counts are 0.
pub fn action_count(options: &[String]) -> Option<u32> {
    options
        .iter()
        .find(|opt| opt.starts_with("num-actions:") || opt.starts_with("item:cast:actions:"))
        .map(|opt| {
            opt.rsplit(':')
                .next()
                .and_then(|n| n.trim().parse().ok())
                .unwrap_or(0)
        })
}

fn element_text(haystack: &str, open: &str) -> Option<String> {
    let at = haystack.find(open)?;
    Some(text_until_close(&haystack[at + open.len()..]))
}

/// Text up to the element's closing tag, with nested tags dropped.
fn text_until_close(rest: &str) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' => {
                if chars.peek() == Some(&'/') {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                } else {
                    depth += 1;
                }
                for t in chars.by_ref() {
                    if t == '>' {
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out.trim().to_owned()
}
