//! Fuzzy separator arena and evaluator.
//!
//! A weight is a decision tree over an inventory of integer counters.  Each
//! node ("separator") tests one counter against a threshold:
//!
//! * below the threshold: descend into `child`, or return the node's weight;
//! * below the `next` node's threshold: blend this node's resolved weight
//!   with `next`'s, linearly by where the counter sits between the two
//!   thresholds;
//! * otherwise: move on to `next`; the last node of a chain yields its
//!   resolved weight.
//!
//! A chain of `next` links is one `switch` over a counter; `child` is a
//! nested switch inside one case.
//!
//! Nodes live in a flat arena addressed by [`SepId`].  Evaluation walks it
//! with an explicit stack of `(node, coefficient)` pairs and sums
//! `coefficient × weight` at every leaf it reaches, which is the same linear
//! combination the recursive definition produces.  The arena is never
//! mutated by evaluation, so one tree can be shared by any number of bots.

use std::fmt;

use nav_core::BotRng;

use crate::{WeightError, WeightResult};

/// Index of a separator in a [`FuzzyArena`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SepId(pub u32);

impl SepId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SepId({})", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeparatorKind {
    #[default]
    Plain,
    /// Undecided evaluation draws the weight from `[min_weight, max_weight]`.
    Balance,
}

/// One separator node.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzyNode {
    /// Inventory slot tested.
    pub index:      usize,
    /// Threshold.
    pub value:      i32,
    pub kind:       SeparatorKind,
    pub weight:     f32,
    pub min_weight: f32,
    pub max_weight: f32,
    pub child:      Option<SepId>,
    pub next:       Option<SepId>,
}

impl FuzzyNode {
    /// A plain leaf returning `weight`.
    pub fn leaf(index: usize, value: i32, weight: f32) -> Self {
        Self { index, value, weight, min_weight: weight, max_weight: weight, ..Default::default() }
    }

    /// A balance leaf.
    pub fn balance(index: usize, value: i32, weight: f32, min_weight: f32, max_weight: f32) -> Self {
        Self {
            index,
            value,
            kind: SeparatorKind::Balance,
            weight,
            min_weight,
            max_weight,
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: SepId) -> Self {
        self.child = Some(child);
        self
    }

    pub fn with_next(mut self, next: SepId) -> Self {
        self.next = Some(next);
        self
    }
}

// ── Arena ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuzzyArena {
    nodes: Vec<FuzzyNode>,
}

impl FuzzyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: FuzzyNode) -> SepId {
        self.nodes.push(node);
        SepId((self.nodes.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: SepId) -> Option<&FuzzyNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: SepId) -> Option<&mut FuzzyNode> {
        self.nodes.get_mut(id.index())
    }

    /// Check that every link from `root` resolves and that no node is
    /// reached twice.  A tree that passes cannot loop during evaluation.
    pub fn validate_tree(&self, root: SepId) -> WeightResult<()> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        if self.get(root).is_none() {
            return Err(WeightError::DanglingLink { node: root, link: root });
        }
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(WeightError::SharedNode(id));
            }
            let node = &self.nodes[id.index()];
            for link in [node.child, node.next].into_iter().flatten() {
                if self.get(link).is_none() {
                    return Err(WeightError::DanglingLink { node: id, link });
                }
                stack.push(link);
            }
        }
        Ok(())
    }

    /// Evaluate the tree at `root`.  Inventory slots past the end read as 0.
    pub fn evaluate(&self, root: SepId, inventory: &[i32]) -> f32 {
        self.walk(root, inventory, |node| node.weight)
    }

    /// Evaluate with every balance node reached drawing its weight uniformly
    /// from `[min_weight, max_weight]`.
    pub fn evaluate_undecided(&self, root: SepId, inventory: &[i32], rng: &mut BotRng) -> f32 {
        self.walk(root, inventory, |node| match node.kind {
            SeparatorKind::Balance => rng.range_f32(node.min_weight, node.max_weight),
            SeparatorKind::Plain => node.weight,
        })
    }

    /// Assign `value` to weight, min, and max of every node reachable from
    /// `root` through child and next links.
    pub fn assign_all(&mut self, root: SepId, value: f32) {
        let mut stack = vec![root];
        let mut steps = 0;
        while let Some(id) = stack.pop() {
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
            let Some(node) = self.nodes.get_mut(id.index()) else { continue };
            node.weight = value;
            node.min_weight = value;
            node.max_weight = value;
            stack.extend([node.child, node.next].into_iter().flatten());
        }
    }

    fn walk(&self, root: SepId, inventory: &[i32], mut leaf_weight: impl FnMut(&FuzzyNode) -> f32) -> f32 {
        let read = |slot: usize| inventory.get(slot).copied().unwrap_or(0);
        let mut total = 0.0;
        let mut stack: Vec<(SepId, f32)> = vec![(root, 1.0)];
        // In a tree every node is visited at most once.
        let mut budget = self.nodes.len();

        while let Some((id, coef)) = stack.pop() {
            if budget == 0 {
                break;
            }
            budget -= 1;
            let Some(node) = self.get(id) else { continue };
            let have = read(node.index);

            if have < node.value {
                match node.child {
                    Some(child) => stack.push((child, coef)),
                    None => total += coef * leaf_weight(node),
                }
                continue;
            }

            let Some(next_id) = node.next else {
                match node.child {
                    Some(child) => stack.push((child, coef)),
                    None => total += coef * leaf_weight(node),
                }
                continue;
            };
            let Some(next) = self.get(next_id) else {
                total += coef * leaf_weight(node);
                continue;
            };

            if have < next.value {
                let span = (next.value as i64 - node.value as i64) as f32;
                let t = ((have as i64 - node.value as i64) as f32 / span).clamp(0.0, 1.0);
                // Resolved weight: the child's evaluation, else the node's own.
                for (n, c) in [(node, coef * (1.0 - t)), (next, coef * t)] {
                    match n.child {
                        Some(child) => stack.push((child, c)),
                        None => total += c * leaf_weight(n),
                    }
                }
            } else {
                stack.push((next_id, coef));
            }
        }
        total
    }
}
