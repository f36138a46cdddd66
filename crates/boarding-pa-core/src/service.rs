// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airlines::AirlineDirectory;
use crate::airports::AirportDirectory;
use crate::cache::CityCache;
use crate::city::CityResolver;
use crate::settings::Settings;
use crate::simbrief::{
    FetchError, FlightData, FlightPlanParser, FlightPlanSource, GreetingClock, ParseError,
    SimbriefFetcher,
};
use boarding_pa_oracle::{InferenceBackend, OpenAiBackend};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightDataError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Failed to write flight data to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Flight data JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fetch → parse → persist, for one SimBrief user at a time.
pub struct FlightDataService {
    source: Box<dyn FlightPlanSource>,
    airlines: AirlineDirectory,
    resolver: CityResolver,
    greeting_clock: GreetingClock,
    output_path: PathBuf,
}

impl FlightDataService {
    pub fn new(
        source: Box<dyn FlightPlanSource>,
        airlines: AirlineDirectory,
        resolver: CityResolver,
        output_path: PathBuf,
    ) -> Self {
        Self {
            source,
            airlines,
            resolver,
            greeting_clock: GreetingClock::default(),
            output_path,
        }
    }

    pub fn with_greeting_clock(mut self, clock: GreetingClock) -> Self {
        self.greeting_clock = clock;
        self
    }

    /// Loads both directories once and wires the HTTP fetcher and the
    /// optional OpenAI backend from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let paths = &settings.paths;
        let airports = AirportDirectory::load(paths.airports_file()).log_degradation("Airport directory");
        let airlines = AirlineDirectory::load(paths.airlines_file()).log_degradation("Airline directory");

        let backend: Option<Arc<dyn InferenceBackend>> = match settings.openai_config() {
            Some(config) => match OpenAiBackend::new(config) {
                Ok(b) => Some(Arc::new(b)),
                Err(e) => {
                    warn!("OpenAI backend unavailable — error={}", e);
                    None
                }
            },
            None => {
                warn!("OpenAI not configured; unknown airports resolve to UNKNOWN");
                None
            }
        };

        let resolver = CityResolver::new(
            Arc::new(airports),
            CityCache::new(paths.city_cache_file()),
            backend,
        );

        Self::new(
            Box::new(SimbriefFetcher::new(paths.scratch_dir())),
            airlines,
            resolver,
            paths.output_file(),
        )
        .with_greeting_clock(settings.greeting_clock)
    }

    pub fn json_path(&self) -> &Path {
        &self.output_path
    }

    pub fn resolver(&self) -> &CityResolver {
        &self.resolver
    }

    /// Writes the user's flight data to [`json_path`](Self::json_path).
    /// On failure the previous file is left untouched.
    pub fn generate(&self, username: &str) -> Result<PathBuf, FlightDataError> {
        info!("Starting SimBrief data generation — user={}", username);

        let xml_path = self.source.fetch(username).map_err(|e| {
            error!("Fetch stage failed — user={} error={}", username, e);
            e
        })?;

        let parsed = FlightPlanParser::new(&self.airlines, &self.resolver)
            .with_greeting_clock(self.greeting_clock)
            .parse_file(&xml_path);
        remove_scratch(&xml_path);

        let data = parsed
            .map_err(|e| {
                error!("Parse stage failed — user={} error={}", username, e);
                e
            })?
            .log_degradation("Flight data");

        self.persist(&data)?;
        info!(
            "SimBrief data saved — user={} path={}",
            username,
            self.output_path.display()
        );
        Ok(self.output_path.clone())
    }

    pub fn fetch_flight_data(&self, username: &str) -> Result<FlightData, FlightDataError> {
        self.generate(username)?;
        self.read_persisted()
    }

    pub fn read_persisted(&self) -> Result<FlightData, FlightDataError> {
        let content =
            fs::read_to_string(&self.output_path).map_err(|source| FlightDataError::Persist {
                path: self.output_path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, data: &FlightData) -> Result<(), FlightDataError> {
        let persist_err = |source: std::io::Error| FlightDataError::Persist {
            path: self.output_path.clone(),
            source,
        };
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(persist_err)?;
            }
        }
        let content = serde_json::to_string_pretty(data)?;
        fs::write(&self.output_path, content).map_err(persist_err)
    }
}

fn remove_scratch(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed scratch flight plan — path={}", path.display()),
        Err(e) => warn!(
            "Could not remove scratch flight plan — path={} error={}",
            path.display(),
            e
        ),
    }
}
