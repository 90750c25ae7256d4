//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `${VAR}` fails when VAR is unset; `${VAR:-default}` falls back to the
/// default. Bare `$VAR` is left as written, so values such as CMS query
/// strings containing `$` survive untouched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand an optional value, keeping `None` as is.
pub(crate) fn expand_env_opt(
    value: Option<&str>,
    field: &str,
) -> Result<Option<String>, ConfigError> {
    value.map(|v| expand_env(v, field)).transpose()
}

struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tina_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("FORGE_TEST_TINA_HOST", "content.tinajs.io");
        }
        let result = expand_env("https://${FORGE_TEST_TINA_HOST}/graphql", "content.tina.url")
            .unwrap();
        assert_eq!(result, "https://content.tinajs.io/graphql");
        unsafe {
            std::env::remove_var("FORGE_TEST_TINA_HOST");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FORGE_TEST_UNSET");
        }
        let result = expand_env("${FORGE_TEST_UNSET:-local}", "content.backend").unwrap();
        assert_eq!(result, "local");
    }

    #[test]
    fn test_expand_empty_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FORGE_TEST_EMPTY_TOKEN");
        }
        let result = expand_env("${FORGE_TEST_EMPTY_TOKEN:-}", "content.tina.token").unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("FORGE_TEST_MISSING");
        }
        let err = expand_env("${FORGE_TEST_MISSING}", "site.root_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("FORGE_TEST_MISSING"));
        assert!(err.to_string().contains("site.root_dir"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("query($relativePath: String!)", "test.field").unwrap();
        assert_eq!(result, "query($relativePath: String!)");
    }

    #[test]
    fn test_expand_opt_none() {
        assert_eq!(expand_env_opt(None, "content.tina.token").unwrap(), None);
    }
}
