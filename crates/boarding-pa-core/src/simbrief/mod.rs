// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! SimBrief OFP download and parsing.

pub mod fetch;
pub mod parse;

pub use fetch::{FetchError, FlightPlanSource, SimbriefFetcher};
pub use parse::{
    clean_airport_name, FlightData, FlightPlan, FlightPlanParser, GreetingClock, ParseError,
};
