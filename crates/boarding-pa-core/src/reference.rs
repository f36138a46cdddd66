// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::outcome::Outcome;
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Reads a JSON object keyed by ICAO code. Keys come back upper-cased.
///
/// A missing, unreadable or malformed file yields an empty table flagged as
/// degraded; the caller keeps working with "not found" answers.
pub(crate) fn load_icao_table<R: DeserializeOwned>(
    path: &Path,
    label: &str,
) -> Outcome<HashMap<String, R>> {
    if !path.exists() {
        warn!("{} dataset not found — path={}", label, path.display());
        return Outcome::degraded(
            HashMap::new(),
            format!("{} dataset missing at {}", label, path.display()),
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(
                "Failed to read {} dataset — path={} error={}",
                label,
                path.display(),
                e
            );
            return Outcome::degraded(HashMap::new(), format!("{} dataset unreadable: {}", label, e));
        }
    };

    let raw: HashMap<String, R> = match serde_json::from_str(&content) {
        Ok(t) => t,
        Err(e) => {
            warn!(
                "Failed to parse {} dataset — path={} error={}",
                label,
                path.display(),
                e
            );
            return Outcome::degraded(HashMap::new(), format!("{} dataset malformed: {}", label, e));
        }
    };

    let table: HashMap<String, R> = raw
        .into_iter()
        .map(|(k, v)| (normalize_icao(&k), v))
        .collect();

    info!(
        "Loaded {} dataset — entries={} path={}",
        label,
        table.len(),
        path.display()
    );
    Outcome::Ok(table)
}

pub(crate) fn normalize_icao(icao: &str) -> String {
    icao.trim().to_uppercase()
}
