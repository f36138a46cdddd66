// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::city::UNKNOWN_CITY;
use crate::outcome::Outcome;
use crate::reference::normalize_icao;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Durable ICAO → city answers from earlier remote lookups.
///
/// Entries never expire. The file is read on every lookup so a sibling
/// process's answers are picked up; writes re-read, insert and rewrite the
/// whole map (last writer wins).
#[derive(Debug, Clone)]
pub struct CityCache {
    path: PathBuf,
}

impl CityCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All cached entries, keyed by upper-case ICAO. Unreadable or corrupt
    /// files count as empty.
    pub fn entries(&self) -> Outcome<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Outcome::Ok(BTreeMap::new());
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "City cache unreadable; treating as empty — path={} error={}",
                    self.path.display(),
                    e
                );
                return Outcome::degraded(BTreeMap::new(), format!("city cache unreadable: {}", e));
            }
        };

        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(map) => Outcome::Ok(
                map.into_iter()
                    .map(|(icao, city)| (normalize_icao(&icao), city))
                    .collect(),
            ),
            Err(e) => {
                warn!(
                    "City cache corrupt; treating as empty — path={} error={}",
                    self.path.display(),
                    e
                );
                Outcome::degraded(BTreeMap::new(), format!("city cache corrupt: {}", e))
            }
        }
    }

    /// Blank and `UNKNOWN` entries written by older versions count as misses.
    pub fn lookup(&self, icao: &str) -> Outcome<Option<String>> {
        let key = normalize_icao(icao);
        self.entries().map(|mut map| {
            let city = map.remove(&key).filter(|c| {
                let c = c.trim();
                !c.is_empty() && !c.eq_ignore_ascii_case(UNKNOWN_CITY)
            });
            if let Some(city) = &city {
                debug!("City cache hit — icao={} city={}", key, city);
            }
            city
        })
    }

    pub fn store(&self, icao: &str, city: &str) -> Outcome<()> {
        let key = normalize_icao(icao);
        // A corrupt file gets replaced by a fresh map holding just this entry.
        let mut map = self.entries().log_degradation("City cache read before write");
        map.insert(key.clone(), city.to_string());

        match self.write(&map) {
            Ok(()) => {
                debug!(
                    "Cached city — icao={} city={} path={}",
                    key,
                    city,
                    self.path.display()
                );
                Outcome::Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to save city cache — path={} error={}",
                    self.path.display(),
                    e
                );
                Outcome::degraded((), format!("city cache write failed: {}", e))
            }
        }
    }

    fn write(&self, map: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_and_lookup() {
        let dir = tempdir().unwrap();
        let cache = CityCache::new(dir.path().join("cache").join("destination_list.json"));

        assert_eq!(cache.lookup("ZZZZ"), Outcome::Ok(None));
        assert_eq!(cache.store("zzzz", "Nowhereville"), Outcome::Ok(()));
        assert_eq!(
            cache.lookup("ZZZZ"),
            Outcome::Ok(Some("Nowhereville".to_string()))
        );

        // A second handle on the same file sees the entry
        let reopened = CityCache::new(cache.path().to_path_buf());
        assert_eq!(
            reopened.lookup("zzzz").into_value().as_deref(),
            Some("Nowhereville")
        );
    }

    #[test]
    fn test_store_keeps_existing_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("destination_list.json");
        fs::write(&path, r#"{"SBGR": "Sao Paulo"}"#).unwrap();

        let cache = CityCache::new(&path);
        cache.store("VTBS", "Bangkok");

        let entries = cache.entries().into_value();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["SBGR"], "Sao Paulo");
        assert_eq!(entries["VTBS"], "Bangkok");
    }

    #[test]
    fn test_corrupt_cache_reads_as_empty_and_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("destination_list.json");
        fs::write(&path, "[this is not an object").unwrap();

        let cache = CityCache::new(&path);
        let lookup = cache.lookup("SBGR");
        assert!(lookup.is_degraded());
        assert_eq!(lookup.into_value(), None);

        assert_eq!(cache.store("SBGR", "Sao Paulo"), Outcome::Ok(()));
        assert_eq!(
            cache.lookup("SBGR"),
            Outcome::Ok(Some("Sao Paulo".to_string()))
        );
    }

    #[test]
    fn test_unknown_and_blank_entries_are_misses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("destination_list.json");
        fs::write(&path, r#"{"ZZZZ": "UNKNOWN", "YYYY": "unknown", "XXXX": "  "}"#).unwrap();

        let cache = CityCache::new(&path);
        assert_eq!(cache.lookup("ZZZZ"), Outcome::Ok(None));
        assert_eq!(cache.lookup("YYYY"), Outcome::Ok(None));
        assert_eq!(cache.lookup("XXXX"), Outcome::Ok(None));

        // A real answer replaces the stale entry
        cache.store("ZZZZ", "Nowhereville");
        assert_eq!(
            cache.lookup("ZZZZ"),
            Outcome::Ok(Some("Nowhereville".to_string()))
        );
    }

    #[test]
    fn test_hand_edited_lowercase_keys_are_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("destination_list.json");
        fs::write(&path, r#"{"zzzz": "Nowhereville", " sbgr ": "Sao Paulo"}"#).unwrap();

        let cache = CityCache::new(&path);
        assert_eq!(
            cache.lookup("ZZZZ"),
            Outcome::Ok(Some("Nowhereville".to_string()))
        );
        assert_eq!(
            cache.lookup("sbgr").into_value().as_deref(),
            Some("Sao Paulo")
        );

        // Rewrites store the normalized key only
        cache.store("VTBS", "Bangkok");
        let entries = cache.entries().into_value();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains_key("ZZZZ"));
        assert!(!entries.contains_key("zzzz"));
    }

    #[test]
    fn test_unwritable_cache_degrades() {
        let dir = tempdir().unwrap();
        // Parent is a regular file, so create_dir_all fails
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let cache = CityCache::new(blocker.join("destination_list.json"));

        let stored = cache.store("ZZZZ", "Nowhereville");
        assert!(stored.is_degraded());
    }
}
