//! Ranking contract for whole-frame classification results.
//!
//! A classifier hands back observations already sorted by descending
//! confidence. Only the head of that list is shown, and only entries that are
//! reasonably confident.

/// One label reported by an image classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub identifier: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(identifier: impl Into<String>, confidence: f32) -> Self {
        Self {
            identifier: identifier.into(),
            confidence,
        }
    }
}

/// Selection parameters for [`top_classifications`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifyConfig {
    /// How many leading observations are considered.
    pub limit: usize,
    /// Observations at or below this confidence are dropped.
    pub min_confidence: f32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            min_confidence: 0.3,
        }
    }
}

/// Returns the leading observations that clear `min_confidence`, in input
/// order. Lists shorter than `limit` are taken whole.
pub fn top_classifications<'a>(
    observations: &'a [Classification],
    config: &ClassifyConfig,
) -> Vec<&'a Classification> {
    observations
        .iter()
        .take(config.limit)
        .filter(|obs| obs.confidence > config.min_confidence)
        .collect()
}
