//! URL slug derivation.
//!
//! Slugs are derived from display names when the caller does not supply one:
//! lowercase, diacritics stripped, whitespace collapsed to single hyphens,
//! and any remaining non-alphanumeric characters dropped.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive a URL-safe slug from a display name.
///
/// # Examples
///
/// ```
/// use shopkit_core::slug::slugify;
///
/// assert_eq!(slugify("Mobile Phones"), "mobile-phones");
/// assert_eq!(slugify("Café & Thé"), "cafe-the");
/// assert_eq!(slugify("  Áo   Sơ Mi  "), "ao-so-mi");
/// ```
pub fn slugify(name: &str) -> String {
    // NFD decomposition splits accented characters into base + combining
    // marks; dropping the marks strips diacritics.
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;

    for c in folded.chars() {
        // Letters that do not decompose into base + mark under NFD.
        let c = match c {
            'đ' | 'ð' => 'd',
            'ø' => 'o',
            'ł' => 'l',
            other => other,
        };
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' {
            pending_hyphen = true;
        }
        // Any other punctuation is dropped without producing a hyphen.
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Mobile Phones"), "mobile-phones");
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(slugify("Điện Thoại"), "dien-thoai");
        assert_eq!(slugify("Café"), "cafe");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(slugify("  Smart   TVs  "), "smart-tvs");
    }

    #[test]
    fn collapses_existing_hyphens() {
        assert_eq!(slugify("usb--c -- cables"), "usb-c-cables");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("Phones & Tablets!"), "phones-tablets");
    }

    #[test]
    fn names_that_normalize_identically_collide() {
        // The create path relies on this to reject slug collisions.
        assert_eq!(slugify("Phones"), slugify("phones"));
        assert_eq!(slugify("Áo"), slugify("ao"));
    }

    #[test]
    fn empty_and_symbol_only_names_yield_empty_slug() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
