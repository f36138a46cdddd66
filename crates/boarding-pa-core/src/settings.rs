// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::simbrief::GreetingClock;
use boarding_pa_oracle::OpenAiConfig;
use directories::ProjectDirs;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "BOARDING_PA_ROOT";

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const SIMBRIEF_USER: &str = "SIMBRIEF_USER";
pub const GREETING_CLOCK: &str = "GREETING_CLOCK";

/// Root holding `data/`, `config/`, `logs/` and the scratch folder.
///
/// `BOARDING_PA_ROOT` wins, then the platform data dir.
pub fn default_root() -> PathBuf {
    if let Ok(root) = env::var(ROOT_ENV) {
        if !root.trim().is_empty() {
            return PathBuf::from(root);
        }
    }
    ProjectDirs::from("org", "boarding-pa", "Boarding-PA")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn airports_file(&self) -> PathBuf {
        self.data_dir().join("airports.json")
    }

    pub fn airlines_file(&self) -> PathBuf {
        self.data_dir().join("airline_profiles.json")
    }

    pub fn city_cache_file(&self) -> PathBuf {
        self.data_dir().join("cache").join("destination_list.json")
    }

    pub fn output_file(&self) -> PathBuf {
        self.data_dir().join("simbrief_data.json")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join(".temp")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn api_keys_file(&self) -> PathBuf {
        self.root.join("config").join("api_keys.env")
    }
}

/// `KEY=VALUE` pairs from `api_keys.env`. A non-empty process environment
/// variable of the same name takes precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    values: HashMap<String, String>,
}

impl ApiKeys {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("API key file not found — path={}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => {
                let keys = Self::parse(&content);
                info!(
                    "Loaded API key file — keys={} path={}",
                    keys.values.len(),
                    path.display()
                );
                keys
            }
            Err(e) => {
                warn!(
                    "Failed to read API key file — path={} error={}",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        let values = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value as written in the file, ignoring the environment.
    pub fn file_value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.file_value(key).map(str::to_string))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Shows the first and last four characters of long secrets only.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: AppPaths,
    pub keys: ApiKeys,
    pub greeting_clock: GreetingClock,
}

impl Settings {
    pub fn load(root: Option<PathBuf>) -> Self {
        let paths = AppPaths::new(root.unwrap_or_else(default_root));
        let keys = ApiKeys::load(paths.api_keys_file());
        Self::from_parts(paths, keys)
    }

    pub fn from_parts(paths: AppPaths, keys: ApiKeys) -> Self {
        let greeting_clock = match keys.get(GREETING_CLOCK) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring {} — {}", GREETING_CLOCK, e);
                GreetingClock::default()
            }),
            None => GreetingClock::default(),
        };
        Self {
            paths,
            keys,
            greeting_clock,
        }
    }

    pub fn simbrief_user(&self) -> Option<String> {
        self.keys.get(SIMBRIEF_USER)
    }

    /// OpenAI settings, or `None` when no key is configured.
    pub fn openai_config(&self) -> Option<OpenAiConfig> {
        let key = self.keys.get(OPENAI_API_KEY)?;
        let mut config = OpenAiConfig::new(key);
        if let Some(model) = self.keys.get(OPENAI_MODEL) {
            config = config.with_model(model);
        }
        if let Some(base_url) = self.keys.get(OPENAI_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        Some(config)
    }

    pub fn log_summary(&self) {
        info!("Settings — root={}", self.paths.root().display());
        for key in [OPENAI_API_KEY, SIMBRIEF_USER] {
            match self.keys.get(key) {
                Some(v) => debug!("  {} = {}", key, mask_secret(&v)),
                None => debug!("  {} not set", key),
            }
        }
        debug!("  greeting clock = {}", self.greeting_clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_env_file() {
        let keys = ApiKeys::parse(
            "# API keys\n\
             \n\
             BPA_TEST_OPENAI = sk-abc123\n\
             BPA_TEST_USER=\"captain\"\n\
             BPA_TEST_EMPTY=\n\
             not a pair\n\
             BPA_TEST_URL=https://example.com/?a=b\n",
        );
        assert_eq!(keys.len(), 4);
        assert_eq!(keys.file_value("BPA_TEST_OPENAI"), Some("sk-abc123"));
        assert_eq!(keys.file_value("BPA_TEST_USER"), Some("captain"));
        assert_eq!(keys.file_value("BPA_TEST_EMPTY"), None);
        assert_eq!(keys.file_value("BPA_TEST_URL"), Some("https://example.com/?a=b"));
        assert_eq!(keys.get("BPA_TEST_USER").as_deref(), Some("captain"));
    }

    #[test]
    fn test_missing_env_file_is_empty() {
        let dir = tempdir().unwrap();
        let keys = ApiKeys::load(dir.path().join("config").join("api_keys.env"));
        assert!(keys.is_empty());
    }

    #[test]
    fn test_paths_layout() {
        let paths = AppPaths::new("/srv/pa");
        assert_eq!(paths.airports_file(), PathBuf::from("/srv/pa/data/airports.json"));
        assert_eq!(
            paths.city_cache_file(),
            PathBuf::from("/srv/pa/data/cache/destination_list.json")
        );
        assert_eq!(paths.output_file(), PathBuf::from("/srv/pa/data/simbrief_data.json"));
        assert_eq!(paths.scratch_dir(), PathBuf::from("/srv/pa/.temp"));
        assert_eq!(paths.api_keys_file(), PathBuf::from("/srv/pa/config/api_keys.env"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-1234567890abcd"), "sk-1...abcd");
        assert_eq!(mask_secret("short"), "***");
    }

    #[test]
    fn test_load_reads_key_file_under_root() {
        let dir = tempdir().unwrap();
        let paths = AppPaths::new(dir.path());
        fs::create_dir_all(paths.api_keys_file().parent().unwrap()).unwrap();
        fs::write(
            paths.api_keys_file(),
            "BPA_LOAD_TEST_KEY=abc\nGREETING_CLOCK=destination\n",
        )
        .unwrap();

        let settings = Settings::load(Some(dir.path().to_path_buf()));
        assert_eq!(settings.paths.root(), dir.path());
        assert_eq!(settings.keys.file_value("BPA_LOAD_TEST_KEY"), Some("abc"));
        assert_eq!(settings.greeting_clock, GreetingClock::Destination);
    }

    #[test]
    fn test_greeting_clock_from_keys() {
        let mut keys = ApiKeys::default();
        keys.insert(GREETING_CLOCK, "destination");
        let settings = Settings::from_parts(AppPaths::new("/tmp/pa"), keys);
        assert_eq!(settings.greeting_clock, GreetingClock::Destination);

        let mut keys = ApiKeys::default();
        keys.insert(GREETING_CLOCK, "sideways");
        let settings = Settings::from_parts(AppPaths::new("/tmp/pa"), keys);
        assert_eq!(settings.greeting_clock, GreetingClock::Origin);
    }
}
