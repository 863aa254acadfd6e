//! Dynamic selection: forward to one of several owned child selectors.

use crate::{ScoreTable, Selector, SelectorError, Uid};

/// Holds an ordered list of owned child selectors and forwards every query
/// to the one at the current `mode` index.
///
/// Switching modes is a plain assignment guarded by a range check; callers
/// serialize it against in-flight queries through the usual `&mut` borrow.
pub struct DynamicSelector {
    children: Vec<Box<dyn Selector>>,
    mode: usize,
}

impl std::fmt::Debug for DynamicSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicSelector")
            .field("children", &self.children.len())
            .field("mode", &self.mode)
            .finish()
    }
}

impl DynamicSelector {
    /// Selector starting in mode 0. At least one child is required.
    pub fn new(children: Vec<Box<dyn Selector>>) -> Result<Self, SelectorError> {
        if children.is_empty() {
            return Err(SelectorError::EmptyChildren);
        }
        Ok(Self { children, mode: 0 })
    }

    /// Switch which child services queries.
    pub fn set_mode(&mut self, mode: usize) -> Result<(), SelectorError> {
        if mode >= self.children.len() {
            return Err(SelectorError::ModeOutOfRange {
                mode,
                count: self.children.len(),
            });
        }
        self.mode = mode;
        Ok(())
    }

    pub fn mode(&self) -> usize {
        self.mode
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl Selector for DynamicSelector {
    fn name(&self) -> String {
        "Dynamic Selector".to_string()
    }

    fn select(&mut self, uids: &mut Vec<Uid>, scores: &ScoreTable, n: usize) -> Vec<Uid> {
        self.children[self.mode].select(uids, scores, n)
    }
}
