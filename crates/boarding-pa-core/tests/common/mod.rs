// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

#![allow(dead_code)]

use boarding_pa_core::simbrief::fetch::scratch_path;
use boarding_pa_core::{FetchError, FlightPlanSource, InferenceBackend, OracleError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Backend stub that counts calls and records prompts.
pub struct CountingBackend {
    reply: String,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl CountingBackend {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl InferenceBackend for CountingBackend {
    fn infer(&self, prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "counting-stub"
    }
}

/// Writes a fixed OFP document to a fresh scratch file on every fetch.
pub struct FixtureSource {
    scratch: PathBuf,
    xml: String,
    issued: Mutex<Vec<PathBuf>>,
}

impl FixtureSource {
    pub fn new(scratch: &Path, xml: String) -> Self {
        Self {
            scratch: scratch.to_path_buf(),
            xml,
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn issued(&self) -> Vec<PathBuf> {
        self.issued.lock().unwrap().clone()
    }
}

impl FlightPlanSource for FixtureSource {
    fn fetch(&self, username: &str) -> Result<PathBuf, FetchError> {
        let path = scratch_path(&self.scratch, username);
        fs::create_dir_all(&self.scratch).unwrap();
        fs::write(&path, &self.xml).unwrap();
        self.issued.lock().unwrap().push(path.clone());
        Ok(path)
    }
}

/// Lets a test keep a handle on the fixture after the service takes the box.
pub struct Shared(pub Arc<FixtureSource>);

impl FlightPlanSource for Shared {
    fn fetch(&self, username: &str) -> Result<PathBuf, FetchError> {
        self.0.fetch(username)
    }
}

/// Minimal SimBrief OFP. `dest_icao = None` leaves the element out.
pub fn ofp(dest_icao: Option<&str>, dest_name: &str) -> String {
    let icao = dest_icao
        .map(|i| format!("<icao_code>{}</icao_code>", i))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<OFP>
  <fetch><status>Success</status></fetch>
  <general>
    <icao_airline>TAM</icao_airline>
    <flight_number>3054</flight_number>
  </general>
  <origin><icao_code>SBGR</icao_code></origin>
  <destination>
    {}
    <name>{}</name>
  </destination>
  <times>
    <sched_out>1714545000</sched_out>
    <sched_time_enroute>8100</sched_time_enroute>
    <orig_timezone>-3</orig_timezone>
    <dest_timezone>1</dest_timezone>
  </times>
</OFP>"#,
        icao, dest_name
    )
}

pub fn write_airports(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        r#"{
  "EGLL": {"icao": "EGLL", "iata": "LHR", "name": "London Heathrow Airport", "city": "London", "country": "GB", "tz": "Europe/London"},
  "SBGR": {"icao": "SBGR", "iata": "GRU", "name": "Guarulhos International Airport", "city": "Sao Paulo", "country": "BR", "tz": "America/Sao_Paulo"}
}"#,
    )
    .unwrap();
}

pub fn write_airlines(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        r#"{"TAM": {"name": "LATAM Brasil", "languages": ["pt-BR", "en"]}}"#,
    )
    .unwrap();
}
