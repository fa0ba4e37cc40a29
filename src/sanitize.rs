//! Input sanitization for user-supplied task fields.
//!
//! Every function here is pure, synchronous, and total: it never fails and
//! always returns a safe value. Free-text fields pass through these before
//! they are submitted to the API, so markup-based injection never leaves
//! the client.
//!
//! Truncation limits operate on character counts and never split a UTF-8
//! code point.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a sanitized tag, in characters.
pub const MAX_TAG_LEN: usize = 50;

/// Maximum number of tags per task.
pub const MAX_TAGS: usize = 10;

/// Maximum length of a sanitized title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a sanitized description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("valid script pattern"));

static IFRAME_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<iframe\b.*?</iframe>").expect("valid iframe pattern"));

static JS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid scheme pattern"));

static EVENT_ATTR_DQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)on\w+="[^"]*""#).expect("valid handler pattern"));

static EVENT_ATTR_SQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+='[^']*'").expect("valid handler pattern"));

/// Strips dangerous markup from free text.
///
/// Removes `<script>` and `<iframe>` blocks (non-greedy, across lines, up
/// to the matching closing tag), `javascript:` scheme prefixes, and inline
/// `on*="..."` / `on*='...'` event-handler attributes.
///
/// # Examples
///
/// ```
/// use taskdeck::sanitize::sanitize_html;
///
/// assert_eq!(sanitize_html("hi <script>alert(1)</script>there"), "hi there");
/// assert_eq!(sanitize_html("<a href=\"javascript:go()\">x</a>"), "<a href=\"go()\">x</a>");
/// assert_eq!(sanitize_html("<img onerror=\"p()\" src=x>"), "<img  src=x>");
/// ```
pub fn sanitize_html(input: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(input, "");
    let out = IFRAME_BLOCK.replace_all(&out, "");
    let out = JS_SCHEME.replace_all(&out, "");
    let out = EVENT_ATTR_DQ.replace_all(&out, "");
    EVENT_ATTR_SQ.replace_all(&out, "").into_owned()
}

/// Sanitizes a single tag: strips markup, trims, keeps only alphanumeric
/// characters, whitespace, hyphens, and underscores, and truncates to
/// [`MAX_TAG_LEN`] characters.
///
/// # Examples
///
/// ```
/// use taskdeck::sanitize::sanitize_tag;
///
/// assert_eq!(sanitize_tag("  home-office! "), "home-office");
/// assert_eq!(sanitize_tag("<script>x</script>work"), "work");
/// ```
pub fn sanitize_tag(tag: &str) -> String {
    let cleaned = sanitize_html(tag.trim());
    let filtered: String = cleaned
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    truncate_chars(&filtered, MAX_TAG_LEN).to_string()
}

/// Sanitizes a tag list: each entry through [`sanitize_tag`], empties
/// dropped, and the list truncated to the first [`MAX_TAGS`] entries.
pub fn sanitize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(|tag| sanitize_tag(tag.as_ref()))
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect()
}

/// Sanitizes a title: strips markup, truncates to [`MAX_TITLE_LEN`]
/// characters, then trims surrounding whitespace.
pub fn sanitize_title(title: &str) -> String {
    let cleaned = sanitize_html(title);
    truncate_chars(&cleaned, MAX_TITLE_LEN).trim().to_string()
}

/// Sanitizes a description.
///
/// Narrower than [`sanitize_html`]: strips script/iframe blocks and
/// `javascript:` prefixes but leaves inline event-handler attributes
/// alone (descriptions are rendered as plain text, not markup), then
/// truncates to [`MAX_DESCRIPTION_LEN`] characters.
pub fn sanitize_description(description: &str) -> String {
    let out = SCRIPT_BLOCK.replace_all(description, "");
    let out = IFRAME_BLOCK.replace_all(&out, "");
    let out = JS_SCHEME.replace_all(&out, "");
    truncate_chars(&out, MAX_DESCRIPTION_LEN).to_string()
}

/// Validates an optional ISO-8601 date string.
///
/// The empty string is valid (the field is optional). Otherwise the value
/// must parse as RFC 3339, as a naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// timestamp, or as a bare `YYYY-MM-DD` date.
///
/// # Examples
///
/// ```
/// use taskdeck::sanitize::is_valid_date;
///
/// assert!(is_valid_date(""));
/// assert!(is_valid_date("2024-01-01T00:00:00"));
/// assert!(is_valid_date("2024-01-01T00:00:00Z"));
/// assert!(is_valid_date("2024-01-01"));
/// assert!(!is_valid_date("not-a-date"));
/// ```
pub fn is_valid_date(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    chrono::DateTime::parse_from_rfc3339(value).is_ok()
        || chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Truncates to at most `max` characters without splitting a code point.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
