// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Result of an enrichment step that is allowed to fall back.
//!
//! Hard failures travel as the `Err` side of a surrounding `Result`, so a
//! `Result<Outcome<T>, E>` tells apart a clean value, a fallback value with
//! its reason, and a fatal error.

use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Outcome::Degraded {
            value,
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }

    /// Logs the reason (if any) at warn level and hands back the value.
    pub fn log_degradation(self, context: &str) -> T {
        if let Outcome::Degraded { reason, .. } = &self {
            warn!("{} degraded — reason={}", context, reason);
        }
        self.into_value()
    }
}

/// Collects the reasons of several degraded steps into one record.
#[derive(Debug, Default)]
pub(crate) struct Degradations(Vec<String>);

impl Degradations {
    pub(crate) fn take<T>(&mut self, outcome: Outcome<T>) -> T {
        match outcome {
            Outcome::Ok(value) => value,
            Outcome::Degraded { value, reason } => {
                self.0.push(reason);
                value
            }
        }
    }

    pub(crate) fn note(&mut self, reason: impl Into<String>) {
        self.0.push(reason.into());
    }

    pub(crate) fn finish<T>(self, value: T) -> Outcome<T> {
        if self.0.is_empty() {
            Outcome::Ok(value)
        } else {
            Outcome::degraded(value, self.0.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let ok = Outcome::Ok(3);
        assert_eq!(*ok.value(), 3);
        assert!(!ok.is_degraded());
        assert_eq!(ok.reason(), None);

        let fallback = Outcome::degraded("UNKNOWN", "no backend");
        assert!(fallback.is_degraded());
        assert_eq!(fallback.reason(), Some("no backend"));
        assert_eq!(fallback.into_value(), "UNKNOWN");
    }

    #[test]
    fn test_map_keeps_reason() {
        let mapped = Outcome::degraded(2, "cache unreadable").map(|v| v * 10);
        assert_eq!(mapped, Outcome::degraded(20, "cache unreadable"));
    }

    #[test]
    fn test_degradations_join_reasons() {
        let mut d = Degradations::default();
        assert_eq!(d.take(Outcome::Ok("a")), "a");
        assert_eq!(d.take(Outcome::degraded("b", "first")), "b");
        d.note("second");
        assert_eq!(d.finish(()), Outcome::degraded((), "first; second"));

        assert_eq!(Degradations::default().finish(1), Outcome::Ok(1));
    }
}
