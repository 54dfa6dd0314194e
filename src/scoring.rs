//! Content scores kept beside the tree.
//!
//! Nodes cannot carry arbitrary data, so a [`ScoreTable`] maps node identity
//! to a score for the duration of one scoring walk. Presence of an entry is
//! the "already a candidate" marker; dropping or clearing the table retracts
//! every score at once and leaves the tree untouched.

use crate::dom_utils;
use crate::error::{ReaderError, Result};
use crate::rules::RuleSet;
use crate::text_metrics::class_weight;
use kuchikikiki::{Node, NodeRef};
use std::collections::HashMap;

fn node_key(node: &NodeRef) -> usize {
    let ptr: *const Node = &**node;
    ptr as usize
}

/// Base score of a freshly initialized node, by tag.
pub fn tag_weight(tag: &str) -> f64 {
    match tag {
        "div" => 5.0,
        "article" => 25.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Scores of the candidates of one walk, in discovery order.
///
/// The table holds a reference to every scored node so that a node cannot be
/// freed (and its address reused) while its score is alive.
#[derive(Debug, Default)]
pub struct ScoreTable {
    scores: HashMap<usize, (NodeRef, f64)>,
    candidates: Vec<NodeRef>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `node` a fresh score: tag weight plus class weight.
    ///
    /// Re-initializing resets the score; the node keeps its original
    /// position in the candidate order.
    pub fn initialize(&mut self, node: &NodeRef, rules: &RuleSet) -> f64 {
        let tag = dom_utils::tag_name(node).unwrap_or_default();
        let score = tag_weight(&tag) + f64::from(class_weight(node, rules));

        let key = node_key(node);
        if !self.scores.contains_key(&key) {
            self.candidates.push(node.clone());
        }
        self.scores.insert(key, (node.clone(), score));
        score
    }

    /// Add `delta` to the score of an initialized node.
    pub fn accumulate(&mut self, node: &NodeRef, delta: f64) -> Result<()> {
        match self.scores.get_mut(&node_key(node)) {
            Some((_, score)) => {
                *score += delta;
                Ok(())
            }
            None => Err(ReaderError::UnscoredNode),
        }
    }

    /// Overwrite the score of an initialized node.
    pub fn set(&mut self, node: &NodeRef, value: f64) -> Result<()> {
        match self.scores.get_mut(&node_key(node)) {
            Some((_, score)) => {
                *score = value;
                Ok(())
            }
            None => Err(ReaderError::UnscoredNode),
        }
    }

    /// Give every node of `copy` the score its counterpart in `original` has
    /// in `source`. `copy` must be a structural clone of `original`.
    pub fn inherit(&mut self, source: &ScoreTable, original: &NodeRef, copy: &NodeRef) {
        for (from, to) in original
            .inclusive_descendants()
            .zip(copy.inclusive_descendants())
        {
            if let Some(score) = source.score(&from) {
                let key = node_key(&to);
                if !self.scores.contains_key(&key) {
                    self.candidates.push(to.clone());
                }
                self.scores.insert(key, (to, score));
            }
        }
    }

    pub fn score(&self, node: &NodeRef) -> Option<f64> {
        self.scores.get(&node_key(node)).map(|(_, score)| *score)
    }

    pub fn is_scored(&self, node: &NodeRef) -> bool {
        self.scores.contains_key(&node_key(node))
    }

    /// Scored nodes in the order they were first initialized.
    pub fn candidates(&self) -> &[NodeRef] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Retract every score.
    pub fn clear(&mut self) {
        self.scores.clear();
        self.candidates.clear();
    }
}
