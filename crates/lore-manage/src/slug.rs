//! Filename slugs for new source notes.

/// Longest slug kept in a filename.
pub const MAX_SLUG_LEN: usize = 60;

/// Lowercase `title`, keep ASCII letters, digits and whitespace, then join
/// the words with `_`. A title with nothing left becomes `untitled`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    let slug: String = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_joins_words() {
        assert_eq!(slugify("My New Guide!"), "my_new_guide");
        assert_eq!(slugify("  Designing   Data-Intensive Apps "), "designing_dataintensive_apps");
        assert_eq!(slugify("The 12-Factor App"), "the_12factor_app");
    }

    #[test]
    fn drops_non_ascii_letters() {
        assert_eq!(slugify("Café Über"), "caf_ber");
    }

    #[test]
    fn caps_length() {
        let slug = slugify(&"word ".repeat(40));
        assert_eq!(slug.len(), MAX_SLUG_LEN);
        assert!(slug.starts_with("word_word"));
    }

    #[test]
    fn empty_slug_falls_back() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("!!! ???"), "untitled");
    }
}
