// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use log::{debug, error, info};
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SIMBRIEF_XML_URL: &str = "https://www.simbrief.com/api/xml.fetcher.php";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("SimBrief username is empty")]
    EmptyUsername,
    #[error("SimBrief request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("SimBrief returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Invalid SimBrief URL: {0}")]
    Url(String),
    #[error("Failed to write flight plan to {path}: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can put a user's latest flight plan on disk.
pub trait FlightPlanSource {
    /// Returns the path of a freshly written document. The caller owns
    /// the file and removes it when done.
    fn fetch(&self, username: &str) -> Result<PathBuf, FetchError>;
}

/// Downloads the OFP XML from SimBrief.
pub struct SimbriefFetcher {
    base_url: String,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl SimbriefFetcher {
    pub fn new<P: Into<PathBuf>>(scratch_dir: P) -> Self {
        Self {
            base_url: SIMBRIEF_XML_URL.to_string(),
            scratch_dir: scratch_dir.into(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    fn url_for(&self, username: &str) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse_with_params(&self.base_url, &[("username", username)])
            .map_err(|e| FetchError::Url(e.to_string()))
    }
}

impl FlightPlanSource for SimbriefFetcher {
    fn fetch(&self, username: &str) -> Result<PathBuf, FetchError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(FetchError::EmptyUsername);
        }

        info!("Downloading SimBrief flight plan — user={}", username);
        let url = self.url_for(username)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let response = client.get(url.clone()).send().map_err(|e| {
            error!("SimBrief request failed — user={} error={}", username, e);
            FetchError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "SimBrief returned an error status — user={} status={}",
                username, status
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes()?;
        let path = scratch_path(&self.scratch_dir, username);
        write_scratch(&path, &bytes)?;

        debug!(
            "SimBrief XML downloaded — bytes={} path={}",
            bytes.len(),
            path.display()
        );
        Ok(path)
    }
}

/// `simbrief_<user>_<8 hex>.xml` inside `dir`; unique per call.
pub fn scratch_path(dir: &Path, username: &str) -> PathBuf {
    let safe_user: String = username
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let suffix: u32 = rand::thread_rng().gen();
    dir.join(format!("simbrief_{}_{:08x}.xml", safe_user, suffix))
}

pub(crate) fn write_scratch(path: &Path, bytes: &[u8]) -> Result<(), FetchError> {
    let scratch_err = |source: std::io::Error| FetchError::Scratch {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(scratch_err)?;
    }
    fs::write(path, bytes).map_err(scratch_err)
}
