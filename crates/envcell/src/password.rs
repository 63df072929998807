//! Strong-password semantic check.
//!
//! [`PasswordRules`] holds the configurable policy; checks run in a fixed
//! order and report only the first failure: minimum length, maximum length,
//! uppercase, lowercase, digit, special character, and finally a deny-list of
//! common weak patterns. The check always validates the revealed original of
//! a masked value.

use crate::error::ConfigError;
use crate::value::Value;

/// Weak patterns rejected case-insensitively as substrings.
const COMMON_PATTERNS: &[&str] = &[
    "1234",
    "abcd",
    "qwerty",
    "password",
    "abc@123",
    "password@123",
    "12345678",
];

/// Configurable password policy for the `StrongPassword` descriptor.
///
/// # Defaults
///
/// | Rule | Default |
/// |------|---------|
/// | minimum length | 8 |
/// | maximum length | unbounded |
/// | uppercase required | yes |
/// | lowercase required | yes |
/// | digit required | yes |
/// | special character required | yes |
/// | special character set | `!@#$%^&*()_+` |
///
/// # Example
///
/// ```rust,ignore
/// use envcell::PasswordRules;
///
/// let rules = PasswordRules::default()
///     .min_length(12)
///     .special_chars("#!?");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordRules {
    min_length: usize,
    max_length: Option<usize>,
    require_uppercase: bool,
    require_lowercase: bool,
    require_digit: bool,
    require_special: bool,
    special_chars: String,
}

impl PasswordRules {
    /// The default special character set.
    pub const DEFAULT_SPECIAL_CHARS: &'static str = "!@#$%^&*()_+";

    /// Sets the minimum password length.
    #[must_use]
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = length;
        self
    }

    /// Sets the maximum password length (unbounded by default).
    #[must_use]
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Toggles the uppercase-letter requirement.
    #[must_use]
    pub fn require_uppercase(mut self, required: bool) -> Self {
        self.require_uppercase = required;
        self
    }

    /// Toggles the lowercase-letter requirement.
    #[must_use]
    pub fn require_lowercase(mut self, required: bool) -> Self {
        self.require_lowercase = required;
        self
    }

    /// Toggles the digit requirement.
    #[must_use]
    pub fn require_digit(mut self, required: bool) -> Self {
        self.require_digit = required;
        self
    }

    /// Toggles the special-character requirement.
    #[must_use]
    pub fn require_special(mut self, required: bool) -> Self {
        self.require_special = required;
        self
    }

    /// Replaces the special character set.
    #[must_use]
    pub fn special_chars(mut self, chars: impl Into<String>) -> Self {
        self.special_chars = chars.into();
        self
    }

    /// Runs the ordered rule checks, reporting only the first failure.
    pub(crate) fn check(&self, value: &Value) -> Result<(), ConfigError> {
        let Some(password) = value.as_str() else {
            return Err(ConfigError::semantic("password must be a string value"));
        };

        let length = password.chars().count();

        if length < self.min_length {
            return Err(ConfigError::semantic(format!(
                "password must be at least {} characters long",
                self.min_length
            )));
        }

        if let Some(max) = self.max_length
            && length > max
        {
            return Err(ConfigError::semantic(format!(
                "password must be at most {max} characters long"
            )));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::semantic(
                "password must contain at least one uppercase letter",
            ));
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(ConfigError::semantic(
                "password must contain at least one lowercase letter",
            ));
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ConfigError::semantic(
                "password must contain at least one digit",
            ));
        }

        if self.require_special && !password.chars().any(|c| self.special_chars.contains(c)) {
            return Err(ConfigError::semantic(
                "password must contain at least one special character",
            ));
        }

        let lowered = password.to_lowercase();
        if COMMON_PATTERNS.iter().any(|p| lowered.contains(p)) {
            return Err(ConfigError::semantic(
                "password must not contain common patterns or sequences",
            ));
        }

        Ok(())
    }
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: None,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
            special_chars: Self::DEFAULT_SPECIAL_CHARS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_str(rules: &PasswordRules, password: &str) -> Result<(), ConfigError> {
        rules.check(&Value::from(password))
    }

    #[test]
    fn test_strong_password_passes() {
        let rules = PasswordRules::default();
        assert!(check_str(&rules, "Str0ng!Pass").is_ok());
    }

    #[test]
    fn test_length_failure_reported_before_class_rules() {
        // Too short, and also missing nothing else: the length rule must win.
        let err = check_str(&PasswordRules::default(), "Abc@14").expect_err("must fail");
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn test_common_pattern_rejected_even_when_classes_pass() {
        let err = check_str(&PasswordRules::default(), "Abc@1234!").expect_err("must fail");
        assert!(err.to_string().contains("common patterns"));
    }

    #[test]
    fn test_missing_classes_fail_in_order() {
        let rules = PasswordRules::default();

        let err = check_str(&rules, "lower@123x").expect_err("no uppercase");
        assert!(err.to_string().contains("uppercase"));

        let err = check_str(&rules, "UPPER@579X").expect_err("no lowercase");
        assert!(err.to_string().contains("lowercase"));

        let err = check_str(&rules, "Upperlow!x").expect_err("no digit");
        assert!(err.to_string().contains("digit"));

        let err = check_str(&rules, "Upperlow99").expect_err("no special");
        assert!(err.to_string().contains("special character"));
    }

    #[test]
    fn test_max_length_enforced() {
        let rules = PasswordRules::default().max_length(10);
        let err = check_str(&rules, "Toolong!999xx").expect_err("must fail");
        assert!(err.to_string().contains("at most 10"));
    }

    #[test]
    fn test_relaxed_rules() {
        let rules = PasswordRules::default()
            .require_uppercase(false)
            .require_digit(false)
            .require_special(false);
        assert!(check_str(&rules, "justlowercase").is_ok());
    }

    #[test]
    fn test_custom_special_chars() {
        let rules = PasswordRules::default().special_chars("?~");
        assert!(check_str(&rules, "Str0ngpw!").is_err());
        assert!(check_str(&rules, "Str0ngpw~").is_ok());
    }

    #[test]
    fn test_deny_list_is_case_insensitive() {
        let err = check_str(&PasswordRules::default(), "QwErTy!9a").expect_err("must fail");
        assert!(err.to_string().contains("common patterns"));
    }
}
