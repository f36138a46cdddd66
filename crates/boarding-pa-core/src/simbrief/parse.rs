// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airlines::AirlineDirectory;
use crate::city::{CityResolver, UNKNOWN_CITY};
use crate::outcome::{Degradations, Outcome};
use crate::speech;
use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use log::{debug, info};
use regex::Regex;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read flight plan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Flight plan is not valid XML: {0}")]
    Malformed(String),
    #[error("SimBrief rejected the request: {0}")]
    Rejected(String),
    #[error("Flight plan is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("Flight plan field `{field}` has invalid value {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Which local clock picks the greeting.
///
/// `Origin` adds the departure airport's UTC offset to the scheduled
/// departure time, which is what the announcements have always used.
/// `Destination` uses scheduled departure + en-route time at the
/// destination's offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreetingClock {
    #[default]
    Origin,
    Destination,
}

impl FromStr for GreetingClock {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "origin" => Ok(GreetingClock::Origin),
            "destination" => Ok(GreetingClock::Destination),
            other => Err(format!(
                "unknown greeting clock '{}' (expected origin or destination)",
                other
            )),
        }
    }
}

impl fmt::Display for GreetingClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GreetingClock::Origin => write!(f, "origin"),
            GreetingClock::Destination => write!(f, "destination"),
        }
    }
}

/// The record handed to the announcement pipeline. Every key is always
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightData {
    pub icao: String,
    pub airline_name: String,
    pub flight_number: String,
    pub flight_number_text: String,
    pub dest_icao: String,
    pub dest_name: String,
    pub dest_city: String,
    pub duration_seconds: i64,
    pub duration_text: String,
    pub greeting: String,
}

/// Raw values pulled out of a SimBrief OFP document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub airline_icao: String,
    pub flight_number: String,
    pub dest_icao: String,
    pub dest_name: String,
    pub sched_time_enroute: i64,
    pub sched_out: DateTime<Utc>,
    pub orig_offset: FixedOffset,
    pub dest_offset: Option<FixedOffset>,
}

impl FlightPlan {
    pub fn from_xml(xml: &str) -> Result<Self, ParseError> {
        let doc = Document::parse(xml).map_err(|e| ParseError::Malformed(e.to_string()))?;
        let root = doc.root_element();

        if let Some(status) = child(root, "fetch").and_then(|f| text(f, "status")) {
            if !status.is_empty() && !status.eq_ignore_ascii_case("success") {
                return Err(ParseError::Rejected(status));
            }
        }

        let general = child(root, "general").ok_or(ParseError::MissingField("general"))?;
        let destination =
            child(root, "destination").ok_or(ParseError::MissingField("destination"))?;
        let times = child(root, "times").ok_or(ParseError::MissingField("times"))?;

        let dest_icao = required(destination, "icao_code", "destination/icao_code")?;

        let enroute_raw = required(times, "sched_time_enroute", "times/sched_time_enroute")?;
        let sched_time_enroute = parse_seconds("times/sched_time_enroute", &enroute_raw)?;
        if sched_time_enroute < 0 {
            return Err(ParseError::InvalidField {
                field: "times/sched_time_enroute",
                value: enroute_raw,
            });
        }

        let out_raw = required(times, "sched_out", "times/sched_out")?;
        let sched_out = parse_seconds("times/sched_out", &out_raw)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(ParseError::InvalidField {
                field: "times/sched_out",
                value: out_raw,
            })?;

        let orig_offset = match text(times, "orig_timezone").filter(|s| !s.is_empty()) {
            Some(raw) => parse_offset("times/orig_timezone", &raw)?,
            None => Utc.fix(),
        };
        let dest_offset = match text(times, "dest_timezone").filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_offset("times/dest_timezone", &raw)?),
            None => None,
        };

        Ok(Self {
            airline_icao: text(general, "icao_airline")
                .unwrap_or_default()
                .to_uppercase(),
            flight_number: text(general, "flight_number").unwrap_or_default(),
            dest_icao: dest_icao.to_uppercase(),
            dest_name: text(destination, "name").unwrap_or_default(),
            sched_time_enroute,
            sched_out,
            orig_offset,
            dest_offset,
        })
    }

    /// Local wall-clock time used for the greeting.
    pub fn greeting_time(&self, clock: GreetingClock) -> DateTime<FixedOffset> {
        match clock {
            GreetingClock::Origin => self.sched_out.with_timezone(&self.orig_offset),
            GreetingClock::Destination => {
                let arrival = chrono::Duration::try_seconds(self.sched_time_enroute)
                    .and_then(|d| self.sched_out.checked_add_signed(d))
                    .unwrap_or(self.sched_out);
                arrival.with_timezone(&self.dest_offset.unwrap_or(self.orig_offset))
            }
        }
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

/// Trimmed text of a child element; `Some("")` for an empty element.
fn text(node: Node, name: &str) -> Option<String> {
    child(node, name).map(|n| n.text().unwrap_or("").trim().to_string())
}

fn required(node: Node, name: &str, field: &'static str) -> Result<String, ParseError> {
    text(node, name)
        .filter(|s| !s.is_empty())
        .ok_or(ParseError::MissingField(field))
}

fn parse_seconds(field: &'static str, raw: &str) -> Result<i64, ParseError> {
    raw.parse::<i64>().map_err(|_| ParseError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

/// SimBrief gives offsets in hours, sometimes fractional ("5.5", "-3").
fn parse_offset(field: &'static str, raw: &str) -> Result<FixedOffset, ParseError> {
    let invalid = || ParseError::InvalidField {
        field,
        value: raw.to_string(),
    };
    let hours = raw.parse::<f64>().map_err(|_| invalid())?;
    if !hours.is_finite() || hours.abs() >= 24.0 {
        return Err(invalid());
    }
    FixedOffset::east_opt((hours * 3600.0).round() as i32).ok_or_else(invalid)
}

fn name_cleanup_patterns() -> &'static (Regex, Regex) {
    static PATTERNS: OnceLock<(Regex, Regex)> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        (
            Regex::new(r"(?i)\b(intl|international)\b").expect("valid airport-name regex"),
            Regex::new(r"\s{2,}").expect("valid whitespace regex"),
        )
    })
}

/// "Heathrow International (London)" → "Heathrow".
///
/// Cuts at the first `/`, `-` or `(`, drops the words Intl/International,
/// collapses whitespace and trims surrounding punctuation.
pub fn clean_airport_name(name: &str) -> String {
    let head = name.split(['/', '-', '(']).next().unwrap_or("");
    let (intl, spaces) = name_cleanup_patterns();
    let without_intl = intl.replace_all(head, "");
    let collapsed = spaces.replace_all(&without_intl, " ");
    collapsed
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string()
}

/// Turns an OFP document into [`FlightData`], enriching it from the airline
/// directory and the city resolver.
pub struct FlightPlanParser<'a> {
    airlines: &'a AirlineDirectory,
    resolver: &'a CityResolver,
    clock: GreetingClock,
}

impl<'a> FlightPlanParser<'a> {
    pub fn new(airlines: &'a AirlineDirectory, resolver: &'a CityResolver) -> Self {
        Self {
            airlines,
            resolver,
            clock: GreetingClock::default(),
        }
    }

    pub fn with_greeting_clock(mut self, clock: GreetingClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Outcome<FlightData>, ParseError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&xml)
    }

    pub fn parse_str(&self, xml: &str) -> Result<Outcome<FlightData>, ParseError> {
        info!("Parsing SimBrief flight plan");
        let plan = FlightPlan::from_xml(xml)?;
        Ok(self.derive(&plan))
    }

    /// Enrichment only; nothing here can fail once the plan is parsed.
    pub fn derive(&self, plan: &FlightPlan) -> Outcome<FlightData> {
        let mut degradations = Degradations::default();

        let airline_name = self.airlines.name_or_empty(&plan.airline_icao).to_string();
        if airline_name.is_empty() {
            degradations.note(format!(
                "airline '{}' not in airline directory",
                plan.airline_icao
            ));
        }

        let dest_name = clean_airport_name(&speech::title_case(&plan.dest_name));

        let mut dest_city = degradations.take(self.resolver.resolve(&plan.dest_icao));
        if dest_city == UNKNOWN_CITY && !dest_name.is_empty() {
            debug!(
                "Falling back to airport name for city — icao={} name={}",
                plan.dest_icao, dest_name
            );
            degradations.note(format!(
                "city for {} unresolved; using airport name '{}'",
                plan.dest_icao, dest_name
            ));
            dest_city = dest_name.clone();
        }

        let local = plan.greeting_time(self.clock);
        let greeting = speech::greeting(local.hour()).to_string();
        debug!(
            "Greeting chosen — clock={} local_time={} greeting={}",
            self.clock,
            local.format("%H:%M %:z"),
            greeting
        );

        let data = FlightData {
            icao: plan.airline_icao.clone(),
            airline_name,
            flight_number_text: speech::spaced_digits(&plan.flight_number),
            flight_number: plan.flight_number.clone(),
            dest_icao: plan.dest_icao.clone(),
            dest_name,
            dest_city,
            duration_seconds: plan.sched_time_enroute,
            duration_text: speech::seconds_to_words(plan.sched_time_enroute),
            greeting,
        };

        info!(
            "Flight data parsed — airline={} flight={} dest={} city={}",
            data.icao, data.flight_number, data.dest_icao, data.dest_city
        );
        degradations.finish(data)
    }
}
