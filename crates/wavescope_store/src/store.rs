//! The per-trace signal set and its derived-data cache.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wavescope_common::Timescale;

use crate::bits::{bit_decompose, BitSignal};
use crate::signal::{Signal, SignalId, SignalSummary};

/// Owns every signal of one trace, its end time and timescale.
///
/// The store is immutable once built; loading a new trace replaces it
/// wholesale, which also discards the bit decomposition cache.
#[derive(Debug, Default)]
pub struct SignalStore {
    signals: Vec<Signal>,
    by_name: HashMap<String, usize>,
    max_time: u64,
    timescale: Timescale,
    bit_cache: RefCell<HashMap<(SignalId, u32), Rc<[BitSignal]>>>,
}

impl SignalStore {
    /// Builds a store from signals in display order.
    ///
    /// Signal ids are expected to match their position; a signal whose id
    /// does not is still reachable by name.
    pub fn new(signals: Vec<Signal>, max_time: u64, timescale: Timescale) -> Self {
        let by_name = signals
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.name.clone(), idx))
            .collect();
        log::debug!(
            "signal store built: {} signals, max time {}, timescale {}",
            signals.len(),
            max_time,
            timescale
        );
        Self {
            signals,
            by_name,
            max_time,
            timescale,
            bit_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Creates a store with no signals and the default timescale.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns all signals in display order.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Returns the signal with the given id.
    pub fn signal(&self, id: SignalId) -> Option<&Signal> {
        self.signals
            .get(id.as_raw() as usize)
            .filter(|s| s.id == id)
            .or_else(|| self.signals.iter().find(|s| s.id == id))
    }

    /// Looks up a signal by exact name.
    pub fn find(&self, name: &str) -> Option<&Signal> {
        self.by_name.get(name).map(|&idx| &self.signals[idx])
    }

    /// Returns the largest timestamp seen in the trace.
    pub fn max_time(&self) -> u64 {
        self.max_time
    }

    /// Returns the trace timescale.
    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    /// Returns the number of signals.
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Returns `true` if the trace declared no signals.
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Returns the value of `id` at time `t`, or `None` for an unknown id.
    pub fn value_at_time(&self, id: SignalId, t: u64) -> Option<Cow<'_, str>> {
        self.signal(id).map(|s| s.value_at_time(t))
    }

    /// Returns the per-bit decomposition of a signal, MSB first.
    ///
    /// Results are memoized by `(id, width)` for the lifetime of the store.
    pub fn bit_decompose(&self, id: SignalId) -> Option<Rc<[BitSignal]>> {
        let signal = self.signal(id)?;
        let key = (id, signal.width);
        if let Some(hit) = self.bit_cache.borrow().get(&key) {
            return Some(Rc::clone(hit));
        }
        let bits: Rc<[BitSignal]> = bit_decompose(signal).into();
        log::trace!("decomposed {} into {} bits", signal.name, bits.len());
        self.bit_cache.borrow_mut().insert(key, Rc::clone(&bits));
        Some(bits)
    }

    /// Returns how many decompositions are currently cached.
    pub fn cached_decompositions(&self) -> usize {
        self.bit_cache.borrow().len()
    }

    /// Returns `{name, width, is_bus}` for every signal in display order.
    pub fn summaries(&self) -> Vec<SignalSummary> {
        self.signals.iter().map(Signal::summary).collect()
    }
}
