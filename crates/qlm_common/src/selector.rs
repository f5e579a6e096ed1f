//! Response selection: weighted random choice with short-term anti-repetition
//! and two override checks that preempt the draw.
//!
//! Selection order for one call:
//! 1. trigger rules (deterministic, no randomness consumed)
//! 2. rare override (one uniform draw against a fixed probability)
//! 3. weighted draw, retried against the recency buffer, with a linear-scan
//!    fallback once the retry budget is spent
//!
//! Only the weighted path records its output in the recency buffer.

use std::collections::VecDeque;

use rand::rngs::OsRng;
use rand::Rng;

use crate::catalog::{self, Catalog, ConfigurationError};

/// Draws rejected against the recency buffer before falling back to a
/// linear scan.
pub const MAX_DRAW_ATTEMPTS: usize = 20;

/// Uniform `[0, 1)` draws for the selector. Production uses the operating
/// system CSPRNG; tests substitute scripted values.
pub trait RandomSource: Send {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// OS-backed source. `OsRng` reads the platform CSPRNG on every draw, so it
/// needs no seeding and is safe to share across threads.
#[derive(Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_unit(&mut self) -> f64 {
        // 1 part in 100 000 resolution.
        OsRng.gen_range(0..100_000) as f64 / 100_000.0
    }
}

/// Bounded FIFO of the most recently emitted texts. Push evicts the oldest
/// entry once the buffer is full.
#[derive(Debug)]
pub struct RecencyBuffer {
    entries: VecDeque<String>,
    capacity: usize,
}

impl RecencyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e == text)
    }

    pub fn push(&mut self, text: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(text.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic override: fires when the lower-cased input contains every
/// configured substring. Never consumes randomness and never touches the
/// recency buffer.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    substrings: Vec<String>,
    response: String,
}

impl TriggerRule {
    pub fn new<I, S>(substrings: I, response: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            substrings: substrings
                .into_iter()
                .map(|s| s.into().to_lowercase())
                .collect(),
            response: response.into(),
        }
    }

    pub fn matches(&self, input: &str) -> bool {
        if self.substrings.is_empty() {
            return false;
        }
        let haystack = input.to_lowercase();
        self.substrings.iter().all(|n| haystack.contains(n.as_str()))
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Independent low-probability override, checked after the trigger rules and
/// before the weighted draw.
#[derive(Debug, Clone)]
pub struct RareOverride {
    probability: f64,
    response: String,
}

impl RareOverride {
    /// `probability` must lie in `[0, 1)`.
    pub fn new(probability: f64, response: impl Into<String>) -> Result<Self, ConfigurationError> {
        if !(0.0..1.0).contains(&probability) {
            return Err(ConfigurationError::InvalidProbability(probability));
        }
        Ok(Self {
            probability,
            response: response.into(),
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Owns the catalog, the recency buffer, and the override checks. One
/// instance per service; the daemon serializes access through a mutex.
pub struct ResponseSelector {
    catalog: Catalog,
    recent: RecencyBuffer,
    triggers: Vec<TriggerRule>,
    rare: Option<RareOverride>,
    rng: Box<dyn RandomSource>,
}

impl ResponseSelector {
    pub fn new(catalog: Catalog, recency_window: usize) -> Self {
        Self::with_random_source(catalog, recency_window, Box::new(OsRandom))
    }

    pub fn with_random_source(
        catalog: Catalog,
        recency_window: usize,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            catalog,
            recent: RecencyBuffer::new(recency_window),
            triggers: Vec::new(),
            rare: None,
            rng,
        }
    }

    pub fn with_trigger(mut self, rule: TriggerRule) -> Self {
        self.triggers.push(rule);
        self
    }

    pub fn with_rare_override(mut self, rare: RareOverride) -> Self {
        self.rare = Some(rare);
        self
    }

    /// Selector wired the way the service runs it: the duck catalog, the
    /// lyric trigger on "rick" + "roll", and the ASCII-duck rare override.
    /// A `rare_probability` of zero disables the override.
    pub fn standard(
        recency_window: usize,
        rare_probability: f64,
    ) -> Result<Self, ConfigurationError> {
        let mut selector = Self::new(catalog::duck_catalog()?, recency_window).with_trigger(
            TriggerRule::new(["rick", "roll"], catalog::LYRIC_OVERRIDE),
        );
        if rare_probability > 0.0 {
            selector = selector
                .with_rare_override(RareOverride::new(rare_probability, catalog::RARE_DUCK)?);
        }
        Ok(selector)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn recent(&self) -> &RecencyBuffer {
        &self.recent
    }

    /// Produces one reply for `input`. Total for any valid catalog: always
    /// returns within the retry budget plus one fallback scan.
    pub fn select(&mut self, input: &str) -> String {
        // Overrides run once per invocation, not per retry.
        for rule in &self.triggers {
            if rule.matches(input) {
                return rule.response().to_string();
            }
        }

        if let Some(rare) = &self.rare {
            if self.rng.next_unit() <= rare.probability {
                return rare.response.clone();
            }
        }

        let text = self.weighted_draw();
        self.recent.push(&text);
        text
    }

    fn weighted_draw(&mut self) -> String {
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let r = self.rng.next_unit();
            let text = self.catalog.pick(r);
            if !self.recent.contains(text) {
                return text.to_string();
            }
        }

        // Retry budget spent: first non-recent text in catalog order.
        for text in self.catalog.texts() {
            if !self.recent.contains(text) {
                return text.to_string();
            }
        }

        // Every text is currently recent. Only reachable when the window is
        // at least the catalog size; accept one unconstrained draw.
        let r = self.rng.next_unit();
        self.catalog.pick(r).to_string()
    }
}
