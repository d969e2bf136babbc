//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use modindex_core::ClientConfig;

/// Environment variable naming the index root; wins over the config file.
pub const BASE_URL_ENV: &str = "MODINDEX_BASE_URL";

/// TOML-style file configuration for client defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Root URL of the index repository.
    pub base_url: Option<String>,
    /// Upper bound on each index or manifest request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Custom User-Agent string.
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Validates config values against the CLI constraints.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/modindex/config.toml`
/// 2. `$HOME/.config/modindex/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("modindex")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("modindex")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Loads and validates a config file.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Merges CLI flags, environment, and file values into a client configuration.
///
/// Base URL priority: `--base-url` > `MODINDEX_BASE_URL` > file > default.
/// Request timeout priority: `--timeout` > file > default.
#[must_use]
pub fn resolve_client_config(
    cli_base_url: Option<&str>,
    cli_timeout_secs: Option<u64>,
    env_base_url: Option<String>,
    file: Option<&FileConfig>,
) -> ClientConfig {
    let defaults = ClientConfig::default();
    let file = file.cloned().unwrap_or_default();

    let base_url = cli_base_url
        .map(str::to_string)
        .or(env_base_url.filter(|value| !value.trim().is_empty()))
        .or(file.base_url)
        .unwrap_or(defaults.base_url);
    let secs_or = |value: Option<u64>, fallback: Duration| {
        value.map_or(fallback, Duration::from_secs)
    };

    ClientConfig {
        base_url,
        connect_timeout: secs_or(file.connect_timeout_secs, defaults.connect_timeout),
        read_timeout: secs_or(file.read_timeout_secs, defaults.read_timeout),
        request_timeout: secs_or(
            cli_timeout_secs.or(file.request_timeout_secs),
            defaults.request_timeout,
        ),
        user_agent: file.user_agent.or(defaults.user_agent),
    }
}

/// Reads the base URL override from the environment.
#[must_use]
pub fn env_base_url() -> Option<String> {
    env::var(BASE_URL_ENV).ok()
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_number = line_index + 1;

        match key {
            "base_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `base_url` value on line {line_number}"))?;
                cfg.base_url = Some(parsed);
            }
            "user_agent" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `user_agent` value on line {line_number}"))?;
                cfg.user_agent = Some(parsed);
            }
            "request_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `request_timeout_secs` value on line {line_number}")
                })?;
                cfg.request_timeout_secs = Some(parsed);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_number}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `read_timeout_secs` value on line {line_number}")
                })?;
                cfg.read_timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
base_url = "http://localhost:8080/mods/"
request_timeout_secs = 10
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8080/mods/"));
        assert_eq!(cfg.request_timeout_secs, Some(10));
        assert!(cfg.user_agent.is_none());
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r##"
base_url = "http://mirror.example/#mods" # local mirror
connect_timeout_secs = 3 # fail fast
"##,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.base_url.as_deref(), Some("http://mirror.example/#mods"));
        assert_eq!(cfg.connect_timeout_secs, Some(3));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err = parse_config_str("request_timeout_secs = 0").expect_err("0 is below range");
        assert!(err.to_string().contains("request_timeout_secs"));

        let err = parse_config_str("read_timeout_secs = 3601").expect_err("3601 is above range");
        assert!(err.to_string().contains("read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("request_timeout_secs = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("base_url = http://localhost").expect_err("quotes required");
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_parse_config_rejects_empty_user_agent() {
        let err = parse_config_str(r#"user_agent = "  ""#).expect_err("empty UA rejected");
        assert!(err.to_string().contains("user_agent"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("concurrency = 4").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("base_url").expect_err("syntax error expected");
        assert!(err.to_string().contains("expected key = value"));
    }

    #[test]
    fn test_resolve_client_config_defaults() {
        let config = resolve_client_config(None, None, None, None);
        let defaults = ClientConfig::default();
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.request_timeout, defaults.request_timeout);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_resolve_client_config_precedence() {
        let file = FileConfig {
            base_url: Some("http://file.example/mods/".to_string()),
            request_timeout_secs: Some(20),
            connect_timeout_secs: Some(2),
            read_timeout_secs: None,
            user_agent: Some("mirror-bot/1.0".to_string()),
        };

        let from_file = resolve_client_config(None, None, None, Some(&file));
        assert_eq!(from_file.base_url, "http://file.example/mods/");
        assert_eq!(from_file.request_timeout, Duration::from_secs(20));
        assert_eq!(from_file.connect_timeout, Duration::from_secs(2));
        assert_eq!(from_file.user_agent.as_deref(), Some("mirror-bot/1.0"));

        let from_env = resolve_client_config(
            None,
            None,
            Some("http://env.example/mods/".to_string()),
            Some(&file),
        );
        assert_eq!(from_env.base_url, "http://env.example/mods/");

        let from_cli = resolve_client_config(
            Some("http://cli.example/mods/"),
            Some(7),
            Some("http://env.example/mods/".to_string()),
            Some(&file),
        );
        assert_eq!(from_cli.base_url, "http://cli.example/mods/");
        assert_eq!(from_cli.request_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_resolve_client_config_ignores_blank_env() {
        let config = resolve_client_config(None, None, Some("  ".to_string()), None);
        assert_eq!(config.base_url, ClientConfig::default().base_url);
    }

    #[test]
    fn test_load_file_config_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = 12\n").expect("write config");

        let cfg = load_file_config(&path).expect("config should load");
        assert_eq!(cfg.request_timeout_secs, Some(12));
    }

    #[test]
    fn test_load_file_config_missing_file_has_path_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.toml");

        let err = load_file_config(&path).expect_err("missing file should fail");
        assert!(err.to_string().contains("missing.toml"));
    }
}
