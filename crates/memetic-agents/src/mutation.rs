//! Mutation provider: the pluggable seam that rewrites an idea's text and
//! shifts its attributes when a mutation triggers.
//!
//! The [`MutationProvider`] trait is a narrow capability with a single
//! operation. The built-in [`DeterministicMutator`] is always available and
//! is the only provider the tick path ever calls, so tick latency stays
//! bounded. An external provider (for example an LLM-backed rewriter) may
//! be plugged in behind the same contract; such implementations must
//! degrade to the deterministic transform internally instead of surfacing
//! errors, and must never be awaited from inside a tick.

use rand::{Rng, RngCore};

use memetic_types::{MutationType, Region};

/// Source label for the built-in provider.
pub const DETERMINISTIC_SOURCE: &str = "deterministic";

/// The result of mutating an idea's text.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// The rewritten idea text.
    pub text: String,
    /// The mutation kind that was applied.
    pub kind: MutationType,
    /// Which provider produced the outcome (for example
    /// [`DETERMINISTIC_SOURCE`]).
    pub source: String,
    /// Delta to apply to the idea's virality score.
    pub virality_change: f64,
    /// Delta to apply to the idea's emotional valence.
    pub emotional_change: f64,
}

/// A producer of idea mutations.
pub trait MutationProvider {
    /// Mutate `text` according to `kind`.
    ///
    /// `region` localizes the rewrite when the kind calls for it. The
    /// operation is infallible by contract: implementations that depend
    /// on external services fall through to [`DeterministicMutator`]
    /// instead of erroring.
    fn mutate(
        &self,
        text: &str,
        kind: MutationType,
        region: Option<Region>,
        rng: &mut dyn RngCore,
    ) -> MutationOutcome;
}

// ---------------------------------------------------------------------------
// Deterministic built-in
// ---------------------------------------------------------------------------

/// The built-in mutation provider: literal per-kind text templates and
/// fixed attribute deltas (random drift for [`MutationType::Random`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicMutator;

impl DeterministicMutator {
    /// Create the built-in provider.
    pub const fn new() -> Self {
        Self
    }
}

impl MutationProvider for DeterministicMutator {
    fn mutate(
        &self,
        text: &str,
        kind: MutationType,
        region: Option<Region>,
        rng: &mut dyn RngCore,
    ) -> MutationOutcome {
        let (new_text, virality_change, emotional_change) = match kind {
            MutationType::Simplify => {
                (format!("[Simplified] {}...", truncate_chars(text, 100)), 0.05, 0.0)
            }
            MutationType::Emotionalize => (format!("[Emotional] {text}"), 0.02, 0.10),
            MutationType::Localize => {
                let marked = region.map_or_else(
                    || format!("[Localized] {text}"),
                    |r| format!("[{r}] {text}"),
                );
                (marked, 0.02, 0.0)
            }
            MutationType::Polarize => (format!("[Polarized] {text}"), 0.08, 0.15),
            MutationType::Memeify => {
                (format!("[Meme] {}... 🔥", truncate_chars(text, 50)), 0.10, 0.05)
            }
            MutationType::Random => (
                format!("[Variant] {text}"),
                rng.random_range(-0.05..0.10),
                rng.random_range(-0.05..0.10),
            ),
        };

        MutationOutcome {
            text: new_text,
            kind,
            source: String::from(DETERMINISTIC_SOURCE),
            virality_change,
            emotional_change,
        }
    }
}

/// Take at most `max` characters of `text`, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text.get(..idx).unwrap_or(text),
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
