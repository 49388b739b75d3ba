//! Line-break normalisation, applied to the raw HTML before parsing.
//!
//! Text flattening later in the pipeline trims each text fragment and joins
//! them with no separator, so `foo<br>bar` would come out as `foobar` — the
//! only whitespace between the fragments was the line break itself. Rewriting
//! every `<br>` to a single space up front keeps those fragments separated.
//!
//! This must run on the *source string*: after parsing, `br` is an element
//! node and the adjacent text fragments are already split.

use once_cell::sync::Lazy;
use regex::Regex;

// Matches <br>, <br/>, <br />, any case.
static RE_BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Replace every line-break tag with a single space.
pub fn normalize_line_breaks(html: &str) -> String {
    RE_BR.replace_all(html, " ").to_string()
}
