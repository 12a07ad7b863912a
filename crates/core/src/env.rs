//! `${VAR}` expansion for configuration values.

use crate::error::{ResolveError, Result};
use regex_lite::Regex;
use std::sync::OnceLock;

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"))
}

/// Replace every `${VAR_NAME}` in `s` with the variable's value.
///
/// Unset variables are an error: a configuration value silently keeping its
/// placeholder would later parse as garbage or, worse, as empty.
pub fn expand_env(s: &str) -> Result<String> {
    let mut result = s.to_string();

    for cap in env_pattern().captures_iter(s) {
        if let (Some(full_match), Some(var_match)) = (cap.get(0), cap.get(1)) {
            let var_name = var_match.as_str();
            let value = std::env::var(var_name).map_err(|_| {
                ResolveError::Config(format!("environment variable {var_name} is not set"))
            })?;
            result = result.replace(full_match.as_str(), &value);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env() {
        // Use unique var name to avoid conflicts with parallel tests
        std::env::set_var("DEPLOYER_ENV_TEST_VAR", "0x5B024AfAaaed10bA2788fdDCd7b72Af60A854D2F");
        assert_eq!(
            expand_env("${DEPLOYER_ENV_TEST_VAR}").unwrap(),
            "0x5B024AfAaaed10bA2788fdDCd7b72Af60A854D2F"
        );
        assert_eq!(expand_env("no_vars").unwrap(), "no_vars");
        std::env::remove_var("DEPLOYER_ENV_TEST_VAR");
    }

    #[test]
    fn test_unset_variable_is_an_error() {
        assert!(matches!(
            expand_env("${DEPLOYER_ENV_SURELY_UNSET}"),
            Err(ResolveError::Config(_))
        ));
    }
}
