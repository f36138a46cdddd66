// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Remote text-completion backends used to fill gaps in the static datasets.
//!
//! The core crate only ever sees [`InferenceBackend::infer`]; which service
//! answers the prompt is decided when the backend is built.

use thiserror::Error;

pub mod openai;

pub use openai::{OpenAiBackend, OpenAiConfig};

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),
    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Inference backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Inference backend returned an empty reply")]
    EmptyReply,
}

/// A single-shot prompt → text completion.
pub trait InferenceBackend: Send + Sync {
    fn infer(&self, prompt: &str) -> Result<String, OracleError>;

    /// Short backend name, used in log lines.
    fn name(&self) -> &str;
}
