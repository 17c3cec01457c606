// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Transition tables produced by the pattern compiler.
//!
//! A table holds one [`State`] per pattern atom. A transition whose target
//! equals [`TransitionTable::len`] accepts the key.

use super::predicate::CharPredicate;

/// Extra work the matcher performs when a transition is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    /// Move to the target state and keep walking.
    Advance,

    /// The target state accepts without further input: record the key if the
    /// node is final, then keep walking.
    KeyCheck,

    /// Every continuation from the target state matches: record the node and
    /// its whole `equal` subtree, then stop exploring this branch.
    PrefixShortcut,
}

/// A single edge of the automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Test applied to the node's character
    pub predicate: CharPredicate,

    /// State entered when the predicate holds
    pub target: usize,

    /// Matcher behavior when the transition is taken
    pub action: TransitionAction,
}

impl Transition {
    /// Creates a transition.
    pub fn new(predicate: CharPredicate, target: usize, action: TransitionAction) -> Self {
        Self {
            predicate,
            target,
            action,
        }
    }
}

/// All transitions available at one position of the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    transitions: Vec<Transition>,
}

impl State {
    /// Creates a state from its transitions.
    pub fn new(transitions: Vec<Transition>) -> Self {
        Self { transitions }
    }

    /// The state's transitions, in evaluation order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

/// Immutable compiled form of a pattern.
///
/// Tables are independent of any tree and can be reused across matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    states: Vec<State>,
}

impl TransitionTable {
    /// Creates a table from its states.
    pub fn new(states: Vec<State>) -> Self {
        Self { states }
    }

    /// Number of states; also the accepting target index.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if the table has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns the state at `index`, or `None` past the last state.
    pub fn state(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    /// All states in order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Whether `target` is the accepting index.
    pub fn is_accepting(&self, target: usize) -> bool {
        target == self.states.len()
    }
}
