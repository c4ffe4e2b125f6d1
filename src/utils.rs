use chrono::{SecondsFormat, Utc};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path for taskmate
/// If profile is Dev, uses "taskmate-dev" instead of "taskmate"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "taskmate-dev",
        Profile::Prod => "taskmate",
    };
    ProjectDirs::from("com", "taskmate", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for taskmate
/// If profile is Dev, uses "taskmate-dev" instead of "taskmate"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "taskmate-dev",
        Profile::Prod => "taskmate",
    };
    ProjectDirs::from("com", "taskmate", app_name).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Current instant as the canonical RFC 3339 UTC string,
/// e.g. `2024-06-10T08:00:00+00:00`.
pub fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Today's calendar date in the stored (UTC) frame.
pub fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Calendar-date key (`YYYY-MM-DD`) of a canonical instant string.
pub fn date_key(instant: &str) -> &str {
    instant.get(..10).unwrap_or(instant)
}

/// Minute key (`YYYY-MM-DDTHH:MM`) of a canonical instant string.
pub fn minute_key(instant: &str) -> &str {
    instant.get(..16).unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_string_has_stable_key_layout() {
        let now = now_string();
        assert_eq!(date_key(&now).len(), 10);
        assert_eq!(minute_key(&now).len(), 16);
        assert_eq!(&minute_key(&now)[10..11], "T");
    }
}
