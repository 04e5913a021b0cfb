//! Permissive JSON extraction from free-text model replies
//!
//! Models wrap structured answers in prose and code fences despite explicit
//! instructions. Rather than scattering ad-hoc pattern matching across call
//! sites, all tolerant parsing lives here with one contract: extract the
//! first balanced bracket/brace region, return `None` when there is none.

/// First balanced region delimited by `open`/`close`, anywhere in `text`
///
/// Nesting is tracked, and delimiters inside JSON string literals (including
/// escaped quotes) are ignored. Returns the region with its delimiters.
#[must_use]
pub fn first_json_region(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(&text[start..start + offset + c.len_utf8()]);
            }
        }
    }
    None
}

/// Drop ```` ```json ```` / ```` ``` ```` fence markers and trim
#[must_use]
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a JSON string array out of a free-text reply, keeping only strings
///
/// Preamble and postamble text are tolerated; non-string entries are
/// filtered out; any failure yields an empty list.
#[must_use]
pub fn parse_string_array(text: &str) -> Vec<String> {
    let Some(region) = first_json_region(text, '[', ']') else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(region) {
        Ok(values) => values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "bracketed region is not a JSON array");
            Vec::new()
        }
    }
}
