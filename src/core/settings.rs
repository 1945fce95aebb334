//! Build settings - the configuration variables a package is built with.
//!
//! Settings are plain `name = value` pairs (`build_type`, `arch`, `os`, ...).
//! Folder declarations in `Berth.toml` may reference them as `{build_type}`
//! or `{settings.build_type}`; expansion is a pure string stage and never
//! touches the filesystem.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error while expanding a folder expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unresolved variable `{variable}` in folder expression `{expression}`")]
    UnresolvedVariable { variable: String, expression: String },

    #[error("unbalanced brace in folder expression `{expression}`")]
    UnbalancedBrace { expression: String },

    #[error("invalid setting `{assignment}`, expected `name=value`")]
    InvalidAssignment { assignment: String },
}

/// `{{`, `}}` or a `{name}` reference.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").unwrap());

/// Ordered set of configuration variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Create an empty settings set.
    pub fn new() -> Self {
        Settings::default()
    }

    /// Settings describing the host, with a `Release` build type.
    pub fn host() -> Self {
        let mut settings = Settings::new();
        settings.set("build_type", "Release");
        settings.set("os", host_os());
        settings.set("arch", host_arch());
        settings
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Settings::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Apply a `name=value` assignment (as given with `-s` on the command line).
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), ConfigurationError> {
        let (name, value) = assignment
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .filter(|(n, _)| !n.is_empty())
            .ok_or_else(|| ConfigurationError::InvalidAssignment {
                assignment: assignment.to_string(),
            })?;

        self.set(name, value);
        Ok(())
    }

    /// Look up a variable. The `settings.` prefix is accepted and ignored.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.strip_prefix("settings.").unwrap_or(name);
        self.values.get(name).map(String::as_str)
    }

    /// The build configuration name (`build_type`), if set.
    pub fn build_type(&self) -> Option<&str> {
        self.get("build_type")
    }

    /// The target architecture, if set.
    pub fn arch(&self) -> Option<&str> {
        self.get("arch")
    }

    /// Iterate over all variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every `{name}` reference in `expression`.
    ///
    /// `{{` and `}}` produce literal braces. Any reference to a variable
    /// that is not set is an error, as is a lone brace.
    pub fn expand(&self, expression: &str) -> Result<String, ConfigurationError> {
        let mut out = String::with_capacity(expression.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(expression) {
            let Some(whole) = caps.get(0) else { continue };
            self.push_literal(&mut out, &expression[last..whole.start()], expression)?;
            last = whole.end();

            match whole.as_str() {
                "{{" => out.push('{'),
                "}}" => out.push('}'),
                _ => {
                    let variable = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                    let value = self.get(variable).ok_or_else(|| {
                        ConfigurationError::UnresolvedVariable {
                            variable: variable.to_string(),
                            expression: expression.to_string(),
                        }
                    })?;
                    out.push_str(value);
                }
            }
        }

        self.push_literal(&mut out, &expression[last..], expression)?;
        Ok(out)
    }

    fn push_literal(
        &self,
        out: &mut String,
        literal: &str,
        expression: &str,
    ) -> Result<(), ConfigurationError> {
        if literal.contains(['{', '}']) {
            return Err(ConfigurationError::UnbalancedBrace {
                expression: expression.to_string(),
            });
        }
        out.push_str(literal);
        Ok(())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

fn host_os() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Macos",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x86_64",
        "x86" => "x86",
        "aarch64" => "armv8",
        "arm" => "armv7",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release() -> Settings {
        Settings::new()
            .with("build_type", "Release")
            .with("arch", "x86_64")
    }

    #[test]
    fn test_expand_plain_reference() {
        assert_eq!(release().expand("{build_type}").unwrap(), "Release");
        assert_eq!(release().expand("build_{build_type}").unwrap(), "build_Release");
    }

    #[test]
    fn test_expand_settings_prefix() {
        assert_eq!(
            release().expand("{settings.build_type}-{arch}").unwrap(),
            "Release-x86_64"
        );
    }

    #[test]
    fn test_expand_without_references() {
        assert_eq!(release().expand("out/cmake").unwrap(), "out/cmake");
        assert_eq!(release().expand("").unwrap(), "");
    }

    #[test]
    fn test_expand_escaped_braces() {
        assert_eq!(release().expand("{{literal}}").unwrap(), "{literal}");
    }

    #[test]
    fn test_expand_unresolved_variable() {
        let err = release().expand("build_{compiler}").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnresolvedVariable {
                variable: "compiler".to_string(),
                expression: "build_{compiler}".to_string(),
            }
        );
    }

    #[test]
    fn test_expand_unbalanced_brace() {
        assert!(matches!(
            release().expand("build_{build_type"),
            Err(ConfigurationError::UnbalancedBrace { .. })
        ));
        assert!(matches!(
            release().expand("build}"),
            Err(ConfigurationError::UnbalancedBrace { .. })
        ));
    }

    #[test]
    fn test_apply_assignment() {
        let mut settings = Settings::host();
        settings.apply_assignment("build_type=Debug").unwrap();
        assert_eq!(settings.build_type(), Some("Debug"));

        assert!(settings.apply_assignment("no-equals").is_err());
        assert!(settings.apply_assignment("=Debug").is_err());
    }

    #[test]
    fn test_host_has_defaults() {
        let settings = Settings::host();
        assert_eq!(settings.build_type(), Some("Release"));
        assert!(settings.arch().is_some());
        assert!(settings.get("os").is_some());
    }
}
