//! Duck sound catalog: the fixed weighted table every reply is drawn from.

use thiserror::Error;

/// Weighted table of duck sounds. Order matters for tie-breaking during the
/// cumulative walk, not for probability. Weights are shares of the total,
/// which is not required to sum to 100.
const DUCK_SOUNDS: &[(&str, f64)] = &[
    // Common quacks
    ("quack", 30.0),
    ("Quack", 30.0),
    // Enthusiastic
    ("Quack!", 10.0),
    // Variations
    ("quack quack", 8.0),
    ("QUACK", 5.0),
    ("quack!", 5.0),
    ("Quack quack", 4.0),
    ("quaaack", 3.0),
    ("quaack", 3.0),
    ("quackety quack", 2.0),
    ("quack quack quack", 2.0),
    // Duck family out for a swim
    ("\u{1F986} \u{1F425} \u{1F425} \u{1F425}", 0.5),
    // Easter egg
    ("You're absolutely right!", 0.001),
];

/// Fixed reply for inputs that mention both "rick" and "roll".
pub const LYRIC_OVERRIDE: &str = "\u{1F3B5} Never gonna give you up\n\
Never gonna let you down\n\
Never gonna run around and desert you \u{1F3B5}\n\
...quack";

/// Reply for the independent rare override.
pub const RARE_DUCK: &str = concat!(
    "   __\n",
    " <(o )___\n",
    "  ( ._> /\n",
    "   `---'\n",
    "QUACK.",
);

/// One selectable output text with its selection weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub weight: f64,
}

impl Candidate {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            text: text.into(),
            weight,
        }
    }
}

/// Startup validation failures. The service must refuse to start on any of
/// these rather than fail at call time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("catalog has no candidates")]
    EmptyCatalog,

    #[error("catalog total weight must be positive, got {0}")]
    NonPositiveWeight(f64),

    #[error("override probability must be in [0, 1), got {0}")]
    InvalidProbability(f64),
}

/// The ordered candidate table, fixed for the process lifetime, with its
/// total weight precomputed.
#[derive(Debug, Clone)]
pub struct Catalog {
    candidates: Vec<Candidate>,
    total_weight: f64,
}

impl Catalog {
    /// Validates and freezes a candidate table. An empty table or a
    /// non-positive weight sum is a configuration error.
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, ConfigurationError> {
        if candidates.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }
        let total_weight: f64 = candidates.iter().map(|c| c.weight).sum();
        if !(total_weight > 0.0) {
            return Err(ConfigurationError::NonPositiveWeight(total_weight));
        }
        Ok(Self {
            candidates,
            total_weight,
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Candidate texts in table order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.text.as_str())
    }

    /// Inverse-CDF lookup: walks the table in order accumulating weights and
    /// returns the first candidate whose cumulative share reaches `r`.
    /// `r` must lie in `[0, 1)`.
    pub fn pick(&self, r: f64) -> &str {
        let mut cumulative = 0.0;
        for candidate in &self.candidates {
            cumulative += candidate.weight;
            if cumulative / self.total_weight >= r {
                return &candidate.text;
            }
        }
        // Float rounding can leave the walk fractionally short of 1.0; the
        // last candidate absorbs the remainder.
        &self.candidates[self.candidates.len() - 1].text
    }
}

/// The standard duck catalog.
pub fn duck_catalog() -> Result<Catalog, ConfigurationError> {
    Catalog::new(
        DUCK_SOUNDS
            .iter()
            .map(|(text, weight)| Candidate::new(*text, *weight))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duck_catalog_is_valid() {
        let catalog = duck_catalog().unwrap();
        assert_eq!(catalog.len(), DUCK_SOUNDS.len());
        assert!(catalog.total_weight() > 100.0);
        assert!(catalog.texts().any(|t| t == "quack"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Catalog::new(vec![]).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyCatalog));
    }

    #[test]
    fn test_zero_weight_catalog_rejected() {
        let err = Catalog::new(vec![
            Candidate::new("quack", 0.0),
            Candidate::new("Quack", 0.0),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::NonPositiveWeight(_)));
    }

    #[test]
    fn test_pick_walks_in_table_order() {
        let catalog = Catalog::new(vec![
            Candidate::new("first", 60.0),
            Candidate::new("second", 40.0),
        ])
        .unwrap();

        assert_eq!(catalog.pick(0.0), "first");
        assert_eq!(catalog.pick(0.5), "first");
        assert_eq!(catalog.pick(0.6), "first");
        assert_eq!(catalog.pick(0.61), "second");
        assert_eq!(catalog.pick(0.99999), "second");
    }

    #[test]
    fn test_pick_handles_rounding_tail() {
        let catalog = Catalog::new(vec![
            Candidate::new("a", 1.0),
            Candidate::new("b", 1.0),
            Candidate::new("c", 1.0),
        ])
        .unwrap();

        // Close enough to 1.0 that accumulated thirds may fall short.
        assert_eq!(catalog.pick(0.9999999999), "c");
    }
}
