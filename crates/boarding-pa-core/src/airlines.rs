// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::outcome::Outcome;
use crate::reference::{load_icao_table, normalize_icao};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AirlineRecord {
    #[serde(default)]
    pub icao: String,
    #[serde(default)]
    pub name: String,
}

/// Airline ICAO → display name, from `airline_profiles.json`.
#[derive(Debug, Default)]
pub struct AirlineDirectory {
    airlines: HashMap<String, AirlineRecord>,
}

impl AirlineDirectory {
    pub fn load<P: AsRef<Path>>(path: P) -> Outcome<Self> {
        load_icao_table::<AirlineRecord>(path.as_ref(), "airlines").map(|table| {
            let airlines = table
                .into_iter()
                .map(|(key, mut record)| {
                    record.icao = key.clone();
                    (key, record)
                })
                .collect();
            Self { airlines }
        })
    }

    pub fn from_records<I: IntoIterator<Item = AirlineRecord>>(records: I) -> Self {
        let airlines = records
            .into_iter()
            .map(|r| (normalize_icao(&r.icao), r))
            .collect();
        Self { airlines }
    }

    pub fn lookup(&self, icao: &str) -> Option<&str> {
        self.airlines
            .get(&normalize_icao(icao))
            .map(|r| r.name.trim())
            .filter(|n| !n.is_empty())
    }

    pub fn name_or_empty(&self, icao: &str) -> &str {
        self.lookup(icao).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.airlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_profiles_with_extra_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("airline_profiles.json");
        fs::write(
            &path,
            r#"{
                "BAW": {"name": "British Airways", "languages": ["en-GB"], "voice": "onyx"},
                "tam": {"name": "LATAM Brasil", "languages": ["pt-BR", "en"]},
                "XXX": {"languages": ["en"]}
            }"#,
        )
        .unwrap();

        let airlines = AirlineDirectory::load(&path).into_value();
        assert_eq!(airlines.len(), 3);
        assert_eq!(airlines.lookup("BAW"), Some("British Airways"));
        assert_eq!(airlines.lookup("baw"), Some("British Airways"));
        assert_eq!(airlines.lookup("TAM"), Some("LATAM Brasil"));
        assert_eq!(airlines.lookup("XXX"), None);
        assert_eq!(airlines.name_or_empty("DLH"), "");
    }

    #[test]
    fn test_missing_profiles_file() {
        let dir = tempdir().unwrap();
        let airlines = AirlineDirectory::load(dir.path().join("airline_profiles.json"));
        assert!(airlines.is_degraded());
        assert_eq!(airlines.into_value().name_or_empty("BAW"), "");
    }
}
