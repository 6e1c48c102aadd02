//! User policy records
//!
//! A policy document is a JSON array of objects, one per identity:
//!
//! ```text
//! # comment lines start with '#'
//! [
//!   { "email": "user1@mysite.com" },
//!   { "email": "user2@mysite.com", "path_restriction_reg": "/abc*$" },
//! ]
//! ```
//!
//! `path_restriction_pattern` is accepted as an alternative spelling of
//! `path_restriction_reg`. Any other keys are carried along untouched.

use serde::Serialize;
use serde_json::{Map, Value};

use super::PathPattern;
use crate::core::error::{json_type_name, FormatError};
use crate::core::preprocess::preprocess;
use crate::core::validation::validate_email;

/// Key holding the identity
pub const EMAIL_KEY: &str = "email";

/// Restriction key used by policy files
pub const RESTRICTION_KEY: &str = "path_restriction_reg";

/// Accepted alternative to [`RESTRICTION_KEY`]
pub const RESTRICTION_KEY_ALIAS: &str = "path_restriction_pattern";

/// Knobs for turning a document into policies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Forgive a comma before a closing `]` or `}`
    pub allow_trailing_commas: bool,

    /// Compiled size limit for each restriction pattern
    pub regex_size_limit: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_trailing_commas: true,
            regex_size_limit: None,
        }
    }
}

impl ParseOptions {
    /// Options that accept strict JSON only
    pub fn strict() -> Self {
        ParseOptions {
            allow_trailing_commas: false,
            ..Self::default()
        }
    }
}

/// Access policy for a single identity
#[derive(Debug, Clone, Serialize)]
pub struct UserPolicy {
    /// Identity the policy applies to
    pub email: String,

    /// Paths the identity may access
    #[serde(rename = "path_restriction_reg")]
    pub pattern: PathPattern,

    /// Uninterpreted keys from the source record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserPolicy {
    /// Create a policy from already validated parts
    pub fn new(email: impl Into<String>, pattern: PathPattern) -> Self {
        UserPolicy {
            email: email.into(),
            pattern,
            extra: Map::new(),
        }
    }

    /// Whether this policy's restriction admits `path`
    pub fn permits(&self, path: &str) -> bool {
        self.pattern.matches(path)
    }

    /// Validate one element of the policy array
    ///
    /// `index` is the element's position in the document and only feeds
    /// error messages.
    pub fn from_value(index: usize, value: Value, options: &ParseOptions) -> Result<Self, FormatError> {
        let mut record = match value {
            Value::Object(map) => map,
            other => {
                return Err(FormatError::InvalidRecord {
                    index,
                    reason: format!("expected an object, found {}", json_type_name(&other)),
                })
            }
        };

        let email = match record.remove(EMAIL_KEY) {
            Some(Value::String(email)) => email,
            Some(other) => {
                return Err(FormatError::InvalidEmail {
                    index,
                    value: other.to_string(),
                    reason: "email must be a string",
                })
            }
            None => {
                return Err(FormatError::InvalidEmail {
                    index,
                    value: String::new(),
                    reason: "missing 'email' key",
                })
            }
        };

        if let Err(err) = validate_email(&email) {
            return Err(FormatError::InvalidEmail {
                index,
                value: email,
                reason: err.reason(),
            });
        }

        let source = match (record.remove(RESTRICTION_KEY), record.remove(RESTRICTION_KEY_ALIAS)) {
            (Some(_), Some(_)) => {
                return Err(FormatError::InvalidRecord {
                    index,
                    reason: format!(
                        "both '{}' and '{}' are set for {}",
                        RESTRICTION_KEY, RESTRICTION_KEY_ALIAS, email
                    ),
                })
            }
            (Some(Value::String(s)), None) | (None, Some(Value::String(s))) => s,
            (Some(other), None) | (None, Some(other)) => {
                return Err(FormatError::InvalidRecord {
                    index,
                    reason: format!(
                        "path restriction for {} must be a string, found {}",
                        email,
                        json_type_name(&other)
                    ),
                })
            }
            (None, None) => PathPattern::DEFAULT.to_string(),
        };

        let pattern = match PathPattern::compile_with_limit(&source, options.regex_size_limit) {
            Ok(pattern) => pattern,
            Err(source_err) => {
                return Err(FormatError::InvalidPattern {
                    index,
                    email,
                    pattern: source,
                    source: source_err,
                })
            }
        };

        Ok(UserPolicy {
            email,
            pattern,
            extra: record,
        })
    }
}

/// Decode and validate every record of a policy document
///
/// Stops at the first invalid record; nothing is returned on failure.
pub fn parse_policies(document: &str, options: &ParseOptions) -> Result<Vec<UserPolicy>, FormatError> {
    let json = preprocess(document, options.allow_trailing_commas);
    let value: Value = serde_json::from_str(&json).map_err(FormatError::NotJson)?;

    let elements = match value {
        Value::Array(elements) => elements,
        other => {
            return Err(FormatError::NotArray {
                found: json_type_name(&other),
            })
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| UserPolicy::from_value(index, element, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<UserPolicy, FormatError> {
        UserPolicy::from_value(0, value, &ParseOptions::default())
    }

    #[test]
    fn test_default_pattern_substituted() {
        let policy = parse(json!({"email": "user1@mysite.com"})).unwrap();
        assert_eq!(policy.email, "user1@mysite.com");
        assert_eq!(policy.pattern.as_str(), ".*");
        assert!(policy.pattern.is_unrestricted());
        assert!(policy.permits("/anything/at/all"));
    }

    #[test]
    fn test_restriction_key_and_alias() {
        let policy = parse(json!({"email": "a@b", "path_restriction_reg": "^/docs/"})).unwrap();
        assert_eq!(policy.pattern.as_str(), "^/docs/");

        let policy = parse(json!({"email": "a@b", "path_restriction_pattern": "^/img/"})).unwrap();
        assert_eq!(policy.pattern.as_str(), "^/img/");
        assert!(policy.permits("/img/logo.png"));
        assert!(!policy.permits("/docs/a"));
    }

    #[test]
    fn test_both_restriction_keys_rejected() {
        let err = parse(json!({
            "email": "a@b",
            "path_restriction_reg": "x",
            "path_restriction_pattern": "y"
        }))
        .unwrap_err();
        assert!(matches!(err, FormatError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_non_string_restriction_rejected() {
        for bad in [json!(null), json!(3), json!(["a"]), json!({"re": "a"})] {
            let err = parse(json!({"email": "a@b", "path_restriction_reg": bad})).unwrap_err();
            assert!(matches!(err, FormatError::InvalidRecord { .. }), "{err}");
        }
    }

    #[test]
    fn test_extra_fields_preserved() {
        let policy = parse(json!({
            "email": "a@b",
            "name": "Alice",
            "groups": ["ops"]
        }))
        .unwrap();
        assert_eq!(policy.extra.len(), 2);
        assert_eq!(policy.extra["name"], json!("Alice"));
        assert_eq!(policy.extra["groups"], json!(["ops"]));
        assert!(!policy.extra.contains_key("email"));
    }

    #[test]
    fn test_email_errors() {
        let err = parse(json!({"path_restriction_reg": ".*"})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidEmail { .. }));

        let err = parse(json!({"email": 42})).unwrap_err();
        assert!(matches!(err, FormatError::InvalidEmail { ref value, .. } if value == "42"));

        for bad in ["@x.com", "x@", "nobody"] {
            let err = parse(json!({"email": bad})).unwrap_err();
            assert!(matches!(err, FormatError::InvalidEmail { ref value, .. } if value == bad));
        }
    }

    #[test]
    fn test_email_checked_before_pattern() {
        let err = parse(json!({"email": "x@", "path_restriction_reg": "("})).unwrap_err();
        assert_eq!(err.kind(), "InvalidEmail");
    }

    #[test]
    fn test_invalid_pattern_names_identity() {
        let err = UserPolicy::from_value(
            3,
            json!({"email": "bad@mysite.com", "path_restriction_reg": "/(abc"}),
            &ParseOptions::default(),
        )
        .unwrap_err();
        match err {
            FormatError::InvalidPattern {
                index,
                ref email,
                ref pattern,
                ..
            } => {
                assert_eq!(index, 3);
                assert_eq!(email, "bad@mysite.com");
                assert_eq!(pattern, "/(abc");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("bad@mysite.com"));
    }

    #[test]
    fn test_non_object_element() {
        let err = parse(json!("user@mysite.com")).unwrap_err();
        assert!(matches!(err, FormatError::InvalidRecord { .. }));
    }

    #[test]
    fn test_parse_policies_document() {
        let doc = r#"
# users allowed on the server
[
  {"email": "user1@mysite.com"},
# restricted user
  {"email": "user2@mysite.com", "path_restriction_reg": "/abc*$"},
]
"#;
        let policies = parse_policies(doc, &ParseOptions::default()).unwrap();
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].email, "user1@mysite.com");
        assert_eq!(policies[1].pattern.as_str(), "/abc*$");
    }

    #[test]
    fn test_parse_policies_strict_rejects_trailing_comma() {
        let doc = r#"[{"email": "a@b"},]"#;
        assert!(parse_policies(doc, &ParseOptions::default()).is_ok());
        let err = parse_policies(doc, &ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, FormatError::NotJson(_)));
    }

    #[test]
    fn test_parse_policies_top_level_errors() {
        let err = parse_policies("", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::NotJson(_)));

        let err = parse_policies(r#"{"email": "a@b"}"#, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::NotArray { found: "object" }));

        let err = parse_policies(r#"[{"email": "a@b"}, 7]"#, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_serialize_policy() {
        let policy = parse(json!({"email": "a@b", "path_restriction_reg": "^/x", "team": "ops"})).unwrap();
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            value,
            json!({"email": "a@b", "path_restriction_reg": "^/x", "team": "ops"})
        );
    }

    #[test]
    fn test_regex_size_limit_option() {
        let options = ParseOptions {
            regex_size_limit: Some(1024),
            ..ParseOptions::default()
        };
        let err = UserPolicy::from_value(
            0,
            json!({"email": "a@b", "path_restriction_reg": "a{1000}{1000}"}),
            &options,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "InvalidPattern");
    }
}
