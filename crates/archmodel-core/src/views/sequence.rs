use serde::{Deserialize, Serialize};

/// Order tokens for dynamic view interactions
///
/// Tokens count up from `1`. A parallel sequence claims the next top-level
/// number and counts beneath it, so `1`, then a parallel block `2.1`, `2.2`,
/// then `3` once the block ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceNumber {
    counters: Vec<u32>,
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self { counters: vec![0] }
    }
}

impl SequenceNumber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance and return the next token
    pub fn next_token(&mut self) -> String {
        if let Some(last) = self.counters.last_mut() {
            *last += 1;
        } else {
            self.counters.push(1);
        }
        self.counters
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn start_parallel_sequence(&mut self) {
        if let Some(last) = self.counters.last_mut() {
            *last += 1;
        }
        self.counters.push(0);
    }

    /// Leave the innermost parallel sequence
    ///
    /// Returns false, changing nothing, when no parallel sequence is open.
    pub fn end_parallel_sequence(&mut self) -> bool {
        if self.counters.len() <= 1 {
            return false;
        }
        self.counters.pop();
        true
    }

    /// Nesting depth; 0 outside any parallel sequence
    pub fn depth(&self) -> usize {
        self.counters.len().saturating_sub(1)
    }
}
