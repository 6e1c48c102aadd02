//! Validation for policy identities
//!
//! An identity is an email-shaped string. The check is deliberately shallow:
//! the engine only needs to reject obviously malformed entries, not verify
//! deliverability.

/// Why an email string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    /// No `@` anywhere in the string
    MissingAt,
    /// Every `@` sits at the first character
    AtFirst,
    /// Every `@` sits at the last character
    AtLast,
    /// `@` occurs only at the first and last characters
    AtBoundaryOnly,
}

impl EmailError {
    pub fn reason(&self) -> &'static str {
        match self {
            EmailError::MissingAt => "missing '@'",
            EmailError::AtFirst => "'@' cannot be the first character",
            EmailError::AtLast => "'@' cannot be the last character",
            EmailError::AtBoundaryOnly => "'@' must have characters on both sides",
        }
    }
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Validate the shape of an identity email.
///
/// # Rules
/// - At least one `@`
/// - Some `@` that is neither the first nor the last character
///
/// Several `@` are accepted as long as one of them qualifies.
///
/// # Examples
///
/// ```
/// use path_acl::validation::{validate_email, EmailError};
///
/// assert!(validate_email("user1@mysite.com").is_ok());
/// assert!(validate_email("a@b@c").is_ok());
/// assert_eq!(validate_email("@x.com"), Err(EmailError::AtFirst));
/// assert_eq!(validate_email("x@"), Err(EmailError::AtLast));
/// ```
pub fn validate_email(email: &str) -> Result<(), EmailError> {
    let last = email.len().saturating_sub(1);
    let mut at_first = false;
    let mut at_last = false;

    // '@' is ASCII, so byte offsets are exact character boundaries here
    for (pos, _) in email.match_indices('@') {
        if pos == 0 {
            at_first = true;
        } else if pos == last {
            at_last = true;
        } else {
            return Ok(());
        }
    }

    match (at_first, at_last) {
        (false, false) => Err(EmailError::MissingAt),
        (true, false) => Err(EmailError::AtFirst),
        (false, true) => Err(EmailError::AtLast),
        (true, true) => Err(EmailError::AtBoundaryOnly),
    }
}
