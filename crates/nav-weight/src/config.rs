//! Named weight configurations.

use tracing::warn;

use nav_core::BotRng;

use crate::fuzzy::{FuzzyArena, SepId};
use crate::switch::Switch;
use crate::{WeightError, WeightResult};

/// Most weights one configuration may hold.
pub const MAX_WEIGHTS: usize = 128;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedWeight {
    pub name: String,
    pub root: SepId,
}

/// A set of named fuzzy weights sharing one separator arena.
///
/// Immutable during evaluation; `set_weight` is a load-time edit.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightConfig {
    /// Where the config came from, for diagnostics.
    pub source:  String,
    arena:       FuzzyArena,
    weights:     Vec<NamedWeight>,
}

impl WeightConfig {
    pub fn builder(source: impl Into<String>) -> WeightConfigBuilder {
        WeightConfigBuilder::new(source)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[NamedWeight] {
        &self.weights
    }

    pub fn arena(&self) -> &FuzzyArena {
        &self.arena
    }

    /// Position of the weight called `name`.
    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.weights.iter().position(|w| w.name == name)
    }

    /// Evaluate weight `index` against `inventory`.  Unknown indices give 0.
    pub fn fuzzy_weight(&self, inventory: &[i32], index: usize) -> f32 {
        match self.weights.get(index) {
            Some(w) => self.arena.evaluate(w.root, inventory),
            None => 0.0,
        }
    }

    /// Like [`fuzzy_weight`](Self::fuzzy_weight), drawing balance nodes from
    /// their `[min, max]` range.
    pub fn fuzzy_weight_undecided(&self, inventory: &[i32], index: usize, rng: &mut BotRng) -> f32 {
        match self.weights.get(index) {
            Some(w) => self.arena.evaluate_undecided(w.root, inventory, rng),
            None => 0.0,
        }
    }

    /// Set every separator under `name` to `value`.
    pub fn set_weight(&mut self, name: &str, value: f32) -> WeightResult<()> {
        if name.is_empty() {
            return Err(WeightError::EmptyName);
        }
        let Some(i) = self.find_index(name) else {
            warn!(name, source = %self.source, "unknown weight");
            return Err(WeightError::UnknownWeight(name.to_string()));
        };
        let root = self.weights[i].root;
        self.arena.assign_all(root, value);
        Ok(())
    }
}

// ── WeightConfigBuilder ───────────────────────────────────────────────────────

/// Collects named trees, then validates them in [`build`](Self::build).
pub struct WeightConfigBuilder {
    source:  String,
    arena:   FuzzyArena,
    weights: Vec<NamedWeight>,
}

impl WeightConfigBuilder {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), arena: FuzzyArena::new(), weights: Vec::new() }
    }

    /// Add a weight described as a switch tree.
    pub fn weight(mut self, name: impl Into<String>, tree: Switch) -> Self {
        let root = tree.lower(&mut self.arena);
        self.weights.push(NamedWeight { name: name.into(), root });
        self
    }

    /// Direct arena access for callers that build separators by hand.
    pub fn arena_mut(&mut self) -> &mut FuzzyArena {
        &mut self.arena
    }

    /// Add a weight rooted at a hand-built separator.
    pub fn weight_at(mut self, name: impl Into<String>, root: SepId) -> Self {
        self.weights.push(NamedWeight { name: name.into(), root });
        self
    }

    pub fn build(self) -> WeightResult<WeightConfig> {
        if self.weights.len() > MAX_WEIGHTS {
            warn!(source = %self.source, count = self.weights.len(), "too many fuzzy weights");
            return Err(WeightError::TooManyWeights { limit: MAX_WEIGHTS });
        }
        for (i, w) in self.weights.iter().enumerate() {
            if w.name.is_empty() {
                return Err(WeightError::EmptyName);
            }
            if self.weights[..i].iter().any(|o| o.name == w.name) {
                return Err(WeightError::DuplicateName(w.name.clone()));
            }
            self.arena.validate_tree(w.root)?;
        }
        Ok(WeightConfig { source: self.source, arena: self.arena, weights: self.weights })
    }
}
