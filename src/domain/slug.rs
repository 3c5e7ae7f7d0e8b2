//! Slug checks applied before a lookup reaches the content source.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug is empty")]
    EmptyInput,
}

/// Accept a slug for lookup. Matching is exact, so the input is not trimmed;
/// only empty or whitespace-only input is rejected.
pub fn lookup_slug(input: &str) -> Result<&str, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_input() {
        assert_eq!(lookup_slug(""), Err(SlugError::EmptyInput));
        assert_eq!(lookup_slug("  \t"), Err(SlugError::EmptyInput));
    }

    #[test]
    fn keeps_input_verbatim() {
        assert_eq!(lookup_slug("hello-world"), Ok("hello-world"));
        assert_eq!(lookup_slug(" padded "), Ok(" padded "));
    }
}
