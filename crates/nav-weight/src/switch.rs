//! Declarative construction of separator trees.
//!
//! Weight files describe a tree as nested `switch` statements over inventory
//! slots.  Parsing is the host's job; [`Switch`] is the shape it hands over:
//!
//! ```
//! use nav_weight::{Outcome, Switch, WeightConfig};
//!
//! const HEALTH: usize = 0;
//! const ARMOR: usize = 1;
//!
//! let tree = Switch::on(HEALTH)
//!     .case(25, Switch::on(ARMOR).case(50, 80.0).otherwise(40.0))
//!     .case(100, 20.0)
//!     .otherwise(Outcome::balance(5.0, 0.0, 10.0));
//! let cfg = WeightConfig::builder("items").weight("health", tree).build().unwrap();
//! assert_eq!(cfg.fuzzy_weight(&[10, 0], 0), 80.0);
//! assert_eq!(cfg.fuzzy_weight(&[150, 0], 0), 5.0);
//! ```
//!
//! A case's value is the threshold the slot must stay below.  Between two
//! adjacent thresholds the result blends the two cases.  `otherwise` covers
//! everything at or above the highest threshold, with no blending into it.

use crate::fuzzy::{FuzzyArena, FuzzyNode, SepId};

/// What a case yields.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Weight(f32),
    Balance { weight: f32, min: f32, max: f32 },
    Switch(Switch),
}

impl Outcome {
    pub fn balance(weight: f32, min: f32, max: f32) -> Self {
        Outcome::Balance { weight, min, max }
    }

    fn node_count(&self) -> usize {
        match self {
            Outcome::Switch(s) => 1 + s.node_count(),
            _ => 1,
        }
    }
}

impl From<f32> for Outcome {
    fn from(w: f32) -> Self {
        Outcome::Weight(w)
    }
}

impl From<Switch> for Outcome {
    fn from(s: Switch) -> Self {
        Outcome::Switch(s)
    }
}

/// A switch over one inventory slot.  Cases are ordered by threshold when
/// lowered; equal thresholds keep insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct Switch {
    index:    usize,
    cases:    Vec<(i32, Outcome)>,
    fallback: Option<Box<Outcome>>,
}

impl Switch {
    pub fn on(index: usize) -> Self {
        Self { index, cases: Vec::new(), fallback: None }
    }

    /// Case taken while the slot is below `value`.
    pub fn case(mut self, value: i32, outcome: impl Into<Outcome>) -> Self {
        self.cases.push((value, outcome.into()));
        self
    }

    pub fn otherwise(mut self, outcome: impl Into<Outcome>) -> Self {
        self.fallback = Some(Box::new(outcome.into()));
        self
    }

    /// Number of separators this switch lowers to, nested switches included.
    pub fn node_count(&self) -> usize {
        let cases: usize = self.cases.iter().map(|(_, o)| o.node_count()).sum();
        let fallback = self.fallback.as_ref().map_or(0, |o| o.node_count());
        (cases + fallback).max(1)
    }

    /// Append this switch to `arena` and return its first separator.
    pub(crate) fn lower(self, arena: &mut FuzzyArena) -> SepId {
        let index = self.index;
        let mut cases = self.cases;
        cases.sort_by_key(|(v, _)| *v);
        // The fallback shares the top threshold, so the chain steps into it
        // instead of blending.
        let top = cases.last().map_or(i32::MIN, |(v, _)| *v);
        if let Some(f) = self.fallback {
            cases.push((top, *f));
        }

        let mut next: Option<SepId> = None;
        for (value, outcome) in cases.into_iter().rev() {
            let mut node = match outcome {
                Outcome::Weight(w) => FuzzyNode::leaf(index, value, w),
                Outcome::Balance { weight, min, max } => FuzzyNode::balance(index, value, weight, min, max),
                Outcome::Switch(inner) => {
                    let child = inner.lower(arena);
                    FuzzyNode::leaf(index, value, 0.0).with_child(child)
                }
            };
            node.next = next;
            next = Some(arena.push(node));
        }
        match next {
            Some(first) => first,
            None => arena.push(FuzzyNode::leaf(index, i32::MIN, 0.0)),
        }
    }
}
