// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airports::AirportDirectory;
use crate::cache::CityCache;
use crate::outcome::{Degradations, Outcome};
use crate::reference::normalize_icao;
use boarding_pa_oracle::InferenceBackend;
use log::{info, warn};
use std::sync::Arc;

pub const UNKNOWN_CITY: &str = "UNKNOWN";

pub fn city_prompt(icao: &str) -> String {
    format!(
        "Give ONLY the city name (no extra words) where airport ICAO {} is located.",
        icao
    )
}

/// First line (and first comma-separated part) of a model reply, with
/// surrounding quotes and punctuation removed.
pub fn sanitize_city_reply(reply: &str) -> Option<String> {
    let first = reply
        .trim()
        .split(['\n', ','])
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    if first.is_empty() || first.eq_ignore_ascii_case(UNKNOWN_CITY) {
        None
    } else {
        Some(first.to_string())
    }
}

/// Airport ICAO → city, trying the static directory, then the durable cache,
/// then the remote backend. Never fails; falls back to [`UNKNOWN_CITY`].
pub struct CityResolver {
    airports: Arc<AirportDirectory>,
    cache: CityCache,
    backend: Option<Arc<dyn InferenceBackend>>,
}

impl CityResolver {
    pub fn new(
        airports: Arc<AirportDirectory>,
        cache: CityCache,
        backend: Option<Arc<dyn InferenceBackend>>,
    ) -> Self {
        Self {
            airports,
            cache,
            backend,
        }
    }

    pub fn airports(&self) -> &AirportDirectory {
        &self.airports
    }

    pub fn cache(&self) -> &CityCache {
        &self.cache
    }

    pub fn resolve(&self, icao: &str) -> Outcome<String> {
        let icao = normalize_icao(icao);
        if icao.is_empty() {
            return Outcome::degraded(UNKNOWN_CITY.to_string(), "empty ICAO code");
        }

        // 1. Static directory
        if let Some(city) = self.airports.lookup_city(&icao) {
            return Outcome::Ok(city.to_string());
        }

        // 2. Earlier remote answers
        let mut degradations = Degradations::default();
        if let Some(city) = degradations.take(self.cache.lookup(&icao)) {
            return degradations.finish(city);
        }

        // 3. Remote inference
        info!(
            "Airport not in directory or cache; asking remote backend — icao={}",
            icao
        );
        let city = match self.ask_backend(&icao) {
            Ok(city) => city,
            Err(reason) => {
                degradations.note(reason);
                return degradations.finish(UNKNOWN_CITY.to_string());
            }
        };

        // 4. Write-back so the next run skips the remote call
        degradations.take(self.cache.store(&icao, &city));
        degradations.finish(city)
    }

    fn ask_backend(&self, icao: &str) -> Result<String, String> {
        let backend = match &self.backend {
            Some(b) => b,
            None => {
                warn!("No inference backend configured — icao={}", icao);
                return Err(format!("no inference backend configured for {}", icao));
            }
        };

        match backend.infer(&city_prompt(icao)) {
            Ok(reply) => match sanitize_city_reply(&reply) {
                Some(city) => {
                    info!(
                        "Remote backend resolved city — icao={} city={} backend={}",
                        icao,
                        city,
                        backend.name()
                    );
                    Ok(city)
                }
                None => {
                    warn!(
                        "Remote backend gave an empty city — icao={} backend={}",
                        icao,
                        backend.name()
                    );
                    Err(format!("empty city reply for {}", icao))
                }
            },
            Err(e) => {
                warn!(
                    "Remote city resolution failed — icao={} backend={} error={}",
                    icao,
                    backend.name(),
                    e
                );
                Err(format!("remote resolution failed for {}: {}", icao, e))
            }
        }
    }
}
