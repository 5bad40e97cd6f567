use crate::error::SpiderError;
use crate::http::BASE_URL;
use dotenv::var;
use ini::{Ini, ParseOption};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, trace};

/// Default request timeout; the registry occasionally stalls on profile pages.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SECTION: &str = "riskbird";

/// The identity pair riskbird expects on every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub user_agent: String,
    pub cookie: String,
}

/// Everything the registry client needs, loaded once at start up.
#[derive(Clone, Debug)]
pub struct Settings {
    /// `None` when the config failed to load; requests then go out unauthenticated.
    pub credentials: Option<Credentials>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// de
// ----------------------------------------------------------------------------
//
//  [riskbird]
//  user_agent = Mozilla/5.0 ...
//  riskbird_cookie = ...
//  base_url = https://www.riskbird.com
//  timeout_secs = 30
//
// Values are taken as written: no quote stripping, no backslash escapes.
fn verbatim() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

impl Settings {
    /// Load the `[riskbird]` section of an INI file at `path`.
    ///
    /// `RISKBIRD_USER_AGENT` and `RISKBIRD_COOKIE` (from the environment or `.env`) take
    /// precedence over the file values, and are enough on their own when the file is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpiderError> {
        Self::load_with(path.as_ref(), |key| var(key).ok())
    }

    pub(crate) fn load_with(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SpiderError> {
        let to_err = |reason: String| SpiderError::Config(format!("{}: {reason}", path.display()));

        let ini = if path.is_file() {
            trace!("reading config file: {}", path.display());
            Ini::load_from_file_opt(path, verbatim()).map_err(|err| to_err(err.to_string()))?
        } else {
            trace!("no config file at {}; using environment only", path.display());
            Ini::new()
        };
        let section = ini.section(Some(SECTION));
        let get = |key: &str| {
            section
                .and_then(|props| props.get(key))
                .map(str::to_string)
        };
        let required = |env_key: &str, key: &str| {
            env(env_key)
                .or_else(|| get(key))
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| to_err(format!("missing [{SECTION}] {key} (or {env_key})")))
        };

        let user_agent = required("RISKBIRD_USER_AGENT", "user_agent")?;
        let cookie = required("RISKBIRD_COOKIE", "riskbird_cookie")?;
        let timeout_secs = get("timeout_secs")
            .map(|secs| secs.trim().parse::<u64>())
            .transpose()
            .map_err(|err| to_err(format!("invalid timeout_secs, error({err})")))?;

        debug!("config loaded from {}", path.display());
        Ok(Self {
            credentials: Some(Credentials { user_agent, cookie }),
            base_url: get("base_url")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Override the request timeout, e.g. from the command line.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if let Some(timeout) = timeout {
            self.timeout = timeout;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ini(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_riskbird_section() {
        let file = write_ini(
            "[riskbird]\nuser_agent = Mozilla/5.0 test\nriskbird_cookie = token=abc123\n",
        );
        let settings = Settings::load_with(file.path(), no_env).unwrap();

        let credentials = settings.credentials.unwrap();
        assert_eq!(credentials.user_agent, "Mozilla/5.0 test");
        assert_eq!(credentials.cookie, "token=abc123");
        assert_eq!(settings.base_url, BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn cookie_is_kept_verbatim() {
        let cookie = r#"SESSION=abc; token=xyz; path\to=1; Hm_lvt=#42; quoted="v""#;
        let file = write_ini(&format!(
            "[riskbird]\nuser_agent = ua\nriskbird_cookie = {cookie}\n"
        ));
        let settings = Settings::load_with(file.path(), no_env).unwrap();

        assert_eq!(settings.credentials.unwrap().cookie, cookie);
    }

    #[test]
    fn surrounding_quotes_are_not_stripped() {
        let file = write_ini("[riskbird]\nuser_agent = \"ua\"\nriskbird_cookie = \"a=1\"\n");
        let credentials = Settings::load_with(file.path(), no_env)
            .unwrap()
            .credentials
            .unwrap();

        assert_eq!(credentials.user_agent, "\"ua\"");
        assert_eq!(credentials.cookie, "\"a=1\"");
    }

    #[test]
    fn optional_keys_override_defaults() {
        let file = write_ini(
            "[riskbird]\nuser_agent = ua\nriskbird_cookie = c\nbase_url = http://127.0.0.1:8080/\ntimeout_secs = 5\n",
        );
        let settings = Settings::load_with(file.path(), no_env).unwrap();

        assert_eq!(settings.base_url, "http://127.0.0.1:8080");
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let file = write_ini("[riskbird]\nuser_agent = ua\nriskbird_cookie = c\ntimeout_secs = soon\n");
        assert!(matches!(
            Settings::load_with(file.path(), no_env),
            Err(SpiderError::Config(_))
        ));
    }

    #[test]
    fn missing_section_is_a_config_error() {
        let file = write_ini("[other]\nuser_agent = ua\n");
        let err = Settings::load_with(file.path(), no_env).unwrap_err();
        assert!(matches!(err, SpiderError::Config(_)));
    }

    #[test]
    fn missing_file_without_env_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_with(&dir.path().join("config.ini"), no_env).unwrap_err();
        assert!(matches!(err, SpiderError::Config(_)));
    }

    // the only test that touches the process environment
    #[test]
    fn environment_overrides_file_and_stands_in_for_it() {
        std::env::set_var("RISKBIRD_USER_AGENT", "env-agent");
        std::env::set_var("RISKBIRD_COOKIE", r"env=1; p\q=2");

        let file = write_ini("[riskbird]\nuser_agent = file-agent\nriskbird_cookie = file=1\ntimeout_secs = 7\n");
        let from_file = Settings::load(file.path());

        let dir = tempfile::tempdir().unwrap();
        let without_file = Settings::load(dir.path().join("missing.ini"));

        std::env::remove_var("RISKBIRD_USER_AGENT");
        std::env::remove_var("RISKBIRD_COOKIE");

        let expected = Credentials {
            user_agent: "env-agent".to_string(),
            cookie: r"env=1; p\q=2".to_string(),
        };
        let from_file = from_file.unwrap();
        assert_eq!(from_file.credentials, Some(expected.clone()));
        assert_eq!(from_file.timeout, Duration::from_secs(7));

        let without_file = without_file.unwrap();
        assert_eq!(without_file.credentials, Some(expected));
        assert_eq!(without_file.base_url, BASE_URL);
    }

    #[test]
    fn cli_timeout_wins() {
        let settings = Settings::default().with_timeout(Some(Duration::from_secs(2)));
        assert_eq!(settings.timeout, Duration::from_secs(2));
        assert!(settings.credentials.is_none());
    }
}
