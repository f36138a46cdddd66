// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Flight data for simulated airline PA announcements.
//!
//! A SimBrief username goes in, a `simbrief_data.json` with every field the
//! announcement templates need comes out. Destination cities come from the
//! static airport dataset, then the durable city cache, then an optional
//! remote inference backend.

pub mod airlines;
pub mod airports;
pub mod cache;
pub mod city;
pub mod logging;
pub mod outcome;
mod reference;
pub mod service;
pub mod settings;
pub mod simbrief;
pub mod speech;

pub use airlines::{AirlineDirectory, AirlineRecord};
pub use airports::{AirportDirectory, AirportRecord};
pub use cache::CityCache;
pub use city::{CityResolver, UNKNOWN_CITY};
pub use outcome::Outcome;
pub use service::{FlightDataError, FlightDataService};
pub use settings::{ApiKeys, AppPaths, Settings};
pub use simbrief::{FetchError, FlightData, FlightPlanSource, GreetingClock, ParseError};

pub use boarding_pa_oracle::{InferenceBackend, OracleError};
