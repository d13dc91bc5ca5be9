//! Per-bit decomposition of bus signals.

use wavescope_common::{pad_bits, ValueKind};

use crate::signal::{Signal, SignalId};

/// A derived 1-bit trace synthesized from one bit of a bus.
#[derive(Clone, Debug)]
pub struct BitSignal {
    /// Id of the bus this bit was taken from.
    pub parent: SignalId,
    /// Bit index within the parent (0 is the least significant bit).
    pub bit: u32,
    /// The derived single-bit history, named `parent[bit]`.
    pub signal: Signal,
}

/// Splits `signal` into one [`BitSignal`] per bit, most significant first.
///
/// At every change of the parent the padded value is sliced; bit `i` is the
/// character at position `width - 1 - i`. Real and string values have no bit
/// representation, so every derived bit becomes `x` while they are in effect.
/// Consecutive equal bits collapse into a single change.
pub fn bit_decompose(signal: &Signal) -> Vec<BitSignal> {
    let width = signal.width.max(1);
    let mut bits: Vec<BitSignal> = (0..width)
        .rev()
        .map(|bit| {
            let mut derived = Signal::new(
                signal.id,
                signal.code.clone(),
                format!("{}[{}]", signal.name, bit),
                1,
            );
            derived.color = signal.color;
            BitSignal {
                parent: signal.id,
                bit,
                signal: derived,
            }
        })
        .collect();

    for change in &signal.values {
        let padded = if ValueKind::classify(&change.value).is_literal() {
            "x".repeat(width as usize)
        } else {
            pad_bits(&change.value, width)
        };
        // Row `n` of `bits` holds bit `width - 1 - n`, which is character `n`.
        for (row, ch) in bits.iter_mut().zip(padded.chars()) {
            row.signal.record(change.time, ch.to_string());
        }
    }
    bits
}
