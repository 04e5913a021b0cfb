//! Generated-code sanitisation
//!
//! Models are instructed to answer with raw source, but replies still arrive
//! wrapped in Markdown fences or with stuttered import statements often
//! enough that both are corrected mechanically before execution.

use once_cell::sync::Lazy;
use regex::Regex;

/// `import from x import y` stutter, anchored at line start
static IMPORT_FROM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^import\s+from\s+").expect("static regex"));

/// `import import x` stutter, anchored at line start
static IMPORT_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^import\s+import\s+").expect("static regex"));

/// Strip surrounding Markdown code fences, leaving interior bytes untouched
///
/// Only the first line (when it starts with ```` ``` ````, with or without a
/// language tag) and a trailing bare ```` ``` ```` line are removed.
#[must_use]
pub fn strip_code_fences(code: &str) -> &str {
    let trimmed_start = code.trim_start();
    if !trimmed_start.starts_with("```") {
        return code;
    }
    // drop the fence line itself
    let rest = match trimmed_start.split_once('\n') {
        Some((_fence, rest)) => rest,
        None => return "",
    };
    let rest_trimmed = rest.trim_end();
    // the closing fence only counts when it is a whole line
    match rest_trimmed.rsplit_once('\n') {
        Some((body, last)) if last.trim() == "```" => body,
        None if rest_trimmed.trim() == "```" => "",
        _ => rest,
    }
}

/// Sanitise model-generated source before execution
///
/// Removes surrounding code fences, fixes the two known malformed import
/// patterns, and trims outer whitespace.
#[must_use]
pub fn sanitize_code(code: &str) -> String {
    let unfenced = strip_code_fences(code);
    let fixed = IMPORT_FROM.replace_all(unfenced, "from ");
    let fixed = IMPORT_IMPORT.replace_all(&fixed, "import ");
    fixed.trim().to_string()
}
