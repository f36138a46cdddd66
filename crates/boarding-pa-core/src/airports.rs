// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::outcome::Outcome;
use crate::reference::{load_icao_table, normalize_icao};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One row of `airports.json`. Only `city` matters for resolution; the rest
/// is carried for announcement context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AirportRecord {
    #[serde(default)]
    pub icao: String,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// IANA zone, e.g. "Europe/London"
    #[serde(default)]
    pub tz: Option<String>,
}

/// In-memory airport reference data, loaded once by its owner.
#[derive(Debug, Default)]
pub struct AirportDirectory {
    airports: HashMap<String, AirportRecord>,
}

impl AirportDirectory {
    pub fn load<P: AsRef<Path>>(path: P) -> Outcome<Self> {
        load_icao_table::<AirportRecord>(path.as_ref(), "airports").map(|table| {
            let airports = table
                .into_iter()
                .map(|(key, mut record)| {
                    if record.icao.trim().is_empty() {
                        record.icao = key.clone();
                    }
                    (key, record)
                })
                .collect();
            Self { airports }
        })
    }

    pub fn from_records<I: IntoIterator<Item = AirportRecord>>(records: I) -> Self {
        let airports = records
            .into_iter()
            .map(|r| (normalize_icao(&r.icao), r))
            .collect();
        Self { airports }
    }

    pub fn get(&self, icao: &str) -> Option<&AirportRecord> {
        self.airports.get(&normalize_icao(icao))
    }

    /// City for `icao`, only when the dataset has a non-empty one.
    pub fn lookup_city(&self, icao: &str) -> Option<&str> {
        let city = self
            .get(icao)?
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())?;
        debug!("Airport directory hit — icao={} city={}", icao, city);
        Some(city)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
