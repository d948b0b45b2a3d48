//! Text cleanup and contact validity checks.

/// Trim a value; blank text becomes `None`.
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trimmed and upper-cased.
pub fn upper_text(value: Option<&str>) -> Option<String> {
    clean_text(value).map(|v| v.to_uppercase())
}

/// Trimmed and lower-cased.
pub fn lower_text(value: Option<&str>) -> Option<String> {
    clean_text(value).map(|v| v.to_lowercase())
}

/// Capitalize the first letter of every word and lower-case the rest.
///
/// Any character that is not alphanumeric starts a new word, so
/// `"o'BRIEN-smith"` becomes `"O'Brien-Smith"`.
pub fn initcap(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut word_start = true;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(ch);
            word_start = true;
        }
    }
    out
}

/// Strip `(`, `)` and `-` from a phone number and trim it.
///
/// # Examples
/// ```
/// use caremart_transform::expressions::normalize_phone;
///
/// assert_eq!(normalize_phone("(555) 123-4567"), Some("555 1234567".to_string()));
/// assert_eq!(normalize_phone(" -() "), None);
/// ```
pub fn normalize_phone(value: &str) -> Option<String> {
    let stripped: String = value
        .chars()
        .filter(|ch| !matches!(ch, '(' | ')' | '-'))
        .collect();
    clean_text(Some(&stripped))
}

/// An email is valid when present and containing `@`.
pub fn is_valid_email(email: Option<&str>) -> bool {
    email.is_some_and(|e| e.contains('@'))
}

/// A normalized phone is valid when present and at least ten characters long.
pub fn is_valid_phone(normalized_phone: Option<&str>) -> bool {
    normalized_phone.is_some_and(|p| p.chars().count() >= 10)
}

/// Parse a boolean flag written as true/false, yes/no, y/n, t/f or 1/0.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" | "1" => Some(true),
        "false" | "no" | "n" | "f" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  Jane ")), Some("Jane".to_string()));
        assert_eq!(clean_text(Some("   ")), None);
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(upper_text(Some(" ca ")), Some("CA".to_string()));
        assert_eq!(
            lower_text(Some("Jane.Doe@Example.COM")),
            Some("jane.doe@example.com".to_string())
        );
    }

    #[test]
    fn test_initcap() {
        assert_eq!(initcap("jANE"), "Jane");
        assert_eq!(initcap("mary ann"), "Mary Ann");
        assert_eq!(initcap("o'BRIEN-smith"), "O'Brien-Smith");
        assert_eq!(initcap("new york"), "New York");
    }

    #[test]
    fn test_phone_validity() {
        let normalized = normalize_phone("(555)123-4567");
        assert_eq!(normalized.as_deref(), Some("5551234567"));
        assert!(is_valid_phone(normalized.as_deref()));

        let short = normalize_phone("555-1234");
        assert!(!is_valid_phone(short.as_deref()));
        assert!(!is_valid_phone(None));
    }

    #[test]
    fn test_email_validity() {
        assert!(is_valid_email(Some("a@b.org")));
        assert!(!is_valid_email(Some("ab.org")));
        assert!(!is_valid_email(None));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" yes "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("N"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
