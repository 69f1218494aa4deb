//! Input validation rules shared by the server handlers and the client forms.
//!
//! Clients may clamp input as it is typed, but the checks here run again on
//! the server before any mutation; the server-side result is authoritative.

/// Upper bound on a post title, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// Upper bound on a comment body, in characters.
pub const COMMENT_MAX_CHARS: usize = 1000;

/// Validate a post submission (create or update).
///
/// The title is optional but capped at [`TITLE_MAX_CHARS`]; the body is
/// required and must not be blank.
pub fn validate_post(title: Option<&str>, body: &str) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(title) = title {
        if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(format!(
                "title must be at most {TITLE_MAX_CHARS} characters"
            ));
        }
    }
    if body.trim().is_empty() {
        errors.push("body is required".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a comment body: required, non-blank, at most
/// [`COMMENT_MAX_CHARS`] characters.
pub fn validate_comment(body: &str) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if body.trim().is_empty() {
        errors.push("body is required".to_string());
    } else if body.chars().count() > COMMENT_MAX_CHARS {
        errors.push(format!(
            "body must be at most {COMMENT_MAX_CHARS} characters"
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
