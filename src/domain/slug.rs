//! Slug rules applied to every write path.
//!
//! Slugs are supplied by authors rather than derived from titles, so the
//! domain only checks that a candidate can sit in a URL path segment
//! unescaped: ASCII letters, digits and the RFC 3986 unreserved marks
//! `-`, `_`, `.` and `~`.

use thiserror::Error;

const MAX_SLUG_LEN: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug is {len} characters long; the limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("slug contains `{ch}` at position {position}; only letters, digits, `-`, `_`, `.` and `~` are allowed")]
    InvalidCharacter { ch: char, position: usize },
}

/// Check that `candidate` is a usable slug.
pub fn validate_slug(candidate: &str) -> Result<(), SlugError> {
    if candidate.is_empty() {
        return Err(SlugError::Empty);
    }

    let len = candidate.chars().count();
    if len > MAX_SLUG_LEN {
        return Err(SlugError::TooLong {
            len,
            max: MAX_SLUG_LEN,
        });
    }

    if let Some((position, ch)) = candidate
        .chars()
        .enumerate()
        .find(|(_, ch)| !is_url_safe(*ch))
    {
        return Err(SlugError::InvalidCharacter { ch, position });
    }

    Ok(())
}

fn is_url_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '~')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_slugs() {
        for slug in ["hello-world", "rust_2024", "v1.2.3", "~drafts", "A-Title"] {
            assert_eq!(validate_slug(slug), Ok(()), "{slug}");
        }
    }

    #[test]
    fn rejects_empty_slug() {
        assert_eq!(validate_slug(""), Err(SlugError::Empty));
    }

    #[test]
    fn rejects_whitespace_and_path_separators() {
        assert_eq!(
            validate_slug("hello world"),
            Err(SlugError::InvalidCharacter {
                ch: ' ',
                position: 5
            })
        );
        assert_eq!(
            validate_slug("a/b"),
            Err(SlugError::InvalidCharacter {
                ch: '/',
                position: 1
            })
        );
    }

    #[test]
    fn rejects_non_ascii() {
        let err = validate_slug("café").expect_err("non-ascii slug");
        assert_eq!(
            err,
            SlugError::InvalidCharacter {
                ch: 'é',
                position: 3
            }
        );
    }

    #[test]
    fn rejects_overlong_slug() {
        let slug = "a".repeat(MAX_SLUG_LEN + 1);
        assert_eq!(
            validate_slug(&slug),
            Err(SlugError::TooLong {
                len: MAX_SLUG_LEN + 1,
                max: MAX_SLUG_LEN
            })
        );
    }
}
