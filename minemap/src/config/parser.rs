//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::MAX_FETCH_RETRIES;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::catalog::MAX_PER_PAGE;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [api] section
    if let Some(section) = ini.section(Some("api")) {
        if let Some(v) = section.get("base_url") {
            let v = v.trim();
            if !is_http_url(v) {
                return Err(invalid(
                    "api",
                    "base_url",
                    v,
                    "must be a URL starting with 'http://' or 'https://'",
                ));
            }
            config.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = section.get("timeout") {
            config.api.timeout = parse_in_range("api", "timeout", v, 1, None)?;
        }
        if let Some(v) = section.get("per_page") {
            config.api.per_page = parse_in_range("api", "per_page", v, 1, Some(MAX_PER_PAGE))?;
        }
    }

    // [reconciler] section
    if let Some(section) = ini.section(Some("reconciler")) {
        if let Some(v) = section.get("fetch_timeout") {
            config.reconciler.fetch_timeout =
                parse_in_range("reconciler", "fetch_timeout", v, 1, None)?;
        }
        if let Some(v) = section.get("fetch_retries") {
            config.reconciler.fetch_retries =
                parse_in_range("reconciler", "fetch_retries", v, 0, Some(MAX_FETCH_RETRIES))?;
        }
    }

    // [sync] section
    if let Some(section) = ini.section(Some("sync")) {
        if let Some(v) = section.get("poll_interval") {
            config.sync.poll_interval = parse_in_range("sync", "poll_interval", v, 1, None)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Parses an integer and checks it is at least `min` and, when given, at
/// most `max`.
pub(super) fn parse_in_range<T>(
    section: &str,
    key: &str,
    value: &str,
    min: T,
    max: Option<T>,
) -> Result<T, ConfigFileError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let reason = match max {
        Some(max) => format!("must be an integer between {} and {}", min, max),
        None => format!("must be an integer >= {}", min),
    };
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, &reason))?;
    if parsed < min || max.is_some_and(|max| parsed > max) {
        return Err(invalid(section, key, value, &reason));
    }
    Ok(parsed)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub(super) fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_all_sections() {
        let config = parse(
            "[api]\nbase_url = https://geo.example.org/api/geospatial/\ntimeout = 15\nper_page = 100\n\
             [reconciler]\nfetch_timeout = 5\nfetch_retries = 2\n\
             [sync]\npoll_interval = 90\n\
             [logging]\nfile = /var/log/minemap.log\n",
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://geo.example.org/api/geospatial");
        assert_eq!(config.api.timeout, 15);
        assert_eq!(config.api.per_page, 100);
        assert_eq!(config.reconciler.fetch_timeout, 5);
        assert_eq!(config.reconciler.fetch_retries, 2);
        assert_eq!(config.sync.poll_interval, 90);
        assert_eq!(config.logging.file, PathBuf::from("/var/log/minemap.log"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = parse("[api]\nbase_url = localhost:5000\n");
        match result {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "api");
                assert_eq!(key, "base_url");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_per_page_out_of_range() {
        assert!(parse("[api]\nper_page = 0\n").is_err());
        assert!(parse("[api]\nper_page = 101\n").is_err());
        assert!(parse("[api]\nper_page = lots\n").is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = parse("[sync]\npoll_interval = 0\n").unwrap_err();
        assert!(err.to_string().contains("sync.poll_interval"));
        assert!(err.to_string().contains(">= 1"));
    }

    #[test]
    fn test_fetch_retries_capped() {
        assert!(parse("[reconciler]\nfetch_retries = 10\n").is_ok());
        assert!(parse("[reconciler]\nfetch_retries = 11\n").is_err());
        assert!(parse("[reconciler]\nfetch_retries = -1\n").is_err());
    }

    #[test]
    fn test_blank_log_file_keeps_default() {
        let config = parse("[logging]\nfile =\n").unwrap();
        assert_eq!(config.logging.file, ConfigFile::default().logging.file);
    }

    #[test]
    fn test_unknown_sections_are_ignored() {
        let config = parse("[provider]\ntype = bing\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
