//! Rolling MACD history for signal-line computation across calls.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// Bounded buffer of recent MACD line values, oldest first.
///
/// Owned by the caller and passed into the engine on each new bar so the
/// signal line is an EMA over real history rather than a single point.
#[derive(Debug, Clone)]
pub struct MacdState {
    history: VecDeque<f64>,
    capacity: usize,
}

impl MacdState {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the buffer with the newest `capacity` values of `history`.
    pub fn seed(&mut self, history: &[f64]) {
        self.history.clear();
        let start = history.len().saturating_sub(self.capacity);
        self.history.extend(&history[start..]);
    }

    /// Append a MACD value, evicting the oldest past capacity, and return the history.
    pub fn record(&mut self, macd: f64) -> &[f64] {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(macd);
        self.history.make_contiguous()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent MACD value.
    pub fn latest(&self) -> Option<f64> {
        self.history.back().copied()
    }
}

/// MACD state arena keyed by symbol.
pub struct MacdStateStore {
    /// Key format: uppercase symbol.
    states: DashMap<String, MacdState>,
    capacity: usize,
}

impl MacdStateStore {
    /// Create a new store whose states keep `capacity` values each.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            states: DashMap::new(),
            capacity,
        })
    }

    /// Run `f` with exclusive access to the symbol's state, creating it if needed.
    pub fn with_state<R>(&self, symbol: &str, f: impl FnOnce(&mut MacdState) -> R) -> R {
        let mut entry = self
            .states
            .entry(symbol.to_uppercase())
            .or_insert_with(|| MacdState::new(self.capacity));
        f(entry.value_mut())
    }

    /// Number of MACD values held for a symbol.
    pub fn history_len(&self, symbol: &str) -> usize {
        self.states
            .get(&symbol.to_uppercase())
            .map(|s| s.len())
            .unwrap_or(0)
    }

    pub fn remove(&self, symbol: &str) -> Option<MacdState> {
        self.states
            .remove(&symbol.to_uppercase())
            .map(|(_, state)| state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
