//! Anti-forgery token lookup on the portal's login page.

use std::sync::LazyLock;

use regex::Regex;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static INPUT_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("valid regex"));
static CSRF_INPUT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^_?csrf[_-]?(token)?$").expect("valid regex"));

/// Meta tag names checked in order; the authentication-specific one wins.
const META_NAMES: [&str; 2] = ["authentication-csrf-token", "csrf-token"];

/// Finds the login page's anti-forgery token.
///
/// Looks at `<meta name="authentication-csrf-token">`, then
/// `<meta name="csrf-token">`, then the first hidden-style `<input>` whose
/// name looks like `_csrf_token`, `csrf-token`, `_csrf`, and so on. Returns
/// `None` when nothing matches; the login proceeds without the header.
#[must_use]
pub fn extract_csrf_token(html: &str) -> Option<String> {
    META_NAMES
        .iter()
        .find_map(|name| find_meta_content(html, name))
        .or_else(|| find_csrf_input(html))
}

fn find_meta_content(html: &str, name: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr(tag, "name")?;
        if key.eq_ignore_ascii_case(name) {
            extract_attr(tag, "content")
        } else {
            None
        }
    })
}

fn find_csrf_input(html: &str) -> Option<String> {
    INPUT_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let name = extract_attr(tag, "name")?;
        if CSRF_INPUT_NAME_RE.is_match(&name) {
            extract_attr(tag, "value")
        } else {
            None
        }
    })
}

fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!(r#"(?is)\s{}\s*=\s*["']([^"']+)["']"#, regex::escape(attr));
    let re = Regex::new(&pattern).expect("valid attr regex");
    re.captures(tag)
        .and_then(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_authentication_meta_tag() {
        let html = r#"
            <meta name="csrf-token" content="generic">
            <meta name="authentication-csrf-token" content="auth-specific">
        "#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("auth-specific"));
    }

    #[test]
    fn falls_back_to_generic_meta_tag() {
        let html = r#"<head><meta name="csrf-token" content="generic"></head>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("generic"));
    }

    #[test]
    fn attribute_order_does_not_matter() {
        let html = r#"<meta content="reversed" name='csrf-token'>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("reversed"));
    }

    #[test]
    fn falls_back_to_hidden_input() {
        let html = r#"
            <form>
              <input type="text" name="username" value="someone">
              <input type="hidden" name="_csrf_token" value="from-form">
            </form>
        "#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("from-form"));
    }

    #[test]
    fn input_name_variants_are_recognised() {
        for name in ["_csrf", "csrf-token", "CSRF_TOKEN", "csrftoken"] {
            let html = format!(r#"<input name="{name}" value="v">"#);
            assert_eq!(extract_csrf_token(&html).as_deref(), Some("v"), "{name}");
        }
    }

    #[test]
    fn unrelated_meta_content_is_ignored() {
        let html = r#"<meta name="description" content="Inloggen"><meta name="xcsrf-token" content="x">"#;
        assert_eq!(extract_csrf_token(html), None);
    }

    #[test]
    fn returns_none_without_token() {
        assert_eq!(extract_csrf_token("<html><body>Login</body></html>"), None);
    }
}
