//! Frequency normalization: rescale a frequency table so its sum is exactly
//! a target power of two, without ever mapping a non-zero frequency to
//! zero, spreading any rounding residue per the component this is modeled
//! on (first unit to the most frequent symbol, remainder one unit at a
//! time across symbols with enough weight to absorb it, bounded passes).

/// Minimum and maximum permitted normalization scale.
pub const MIN_SCALE: u32 = 256;
/// Maximum permitted normalization scale.
pub const MAX_SCALE: u32 = 65536;

const SPREAD_PASSES: u32 = 6;
const SPREAD_MIN_FREQ: u32 = 3;

/// Normalize `freqs` so `sum(result) == scale` exactly, preserving which
/// entries are non-zero and approximately preserving relative ordering.
///
/// `scale` must be a power of two in `[MIN_SCALE, MAX_SCALE]`; `freqs` must
/// have at least one non-zero entry.
pub fn normalize(freqs: &[u32], scale: u32) -> Vec<u32> {
    debug_assert!(scale.is_power_of_two() && (MIN_SCALE..=MAX_SCALE).contains(&scale));
    let total: u64 = freqs.iter().map(|&f| f as u64).sum();
    debug_assert!(total > 0, "normalize requires at least one non-zero frequency");

    let mut out: Vec<u32> = freqs
        .iter()
        .map(|&f| {
            if f == 0 {
                0
            } else {
                let scaled = (f as u64 * scale as u64 + total / 2) / total;
                scaled.max(1) as u32
            }
        })
        .collect();

    let sum_out: i64 = out.iter().map(|&v| v as i64).sum();
    let mut diff = scale as i64 - sum_out;
    if diff == 0 {
        return out;
    }

    let idx_max = freqs
        .iter()
        .enumerate()
        .max_by_key(|&(_, &f)| f)
        .map(|(i, _)| i)
        .unwrap_or(0);

    // Step 2: attribute one unit of the residue to the most frequent symbol.
    let step = diff.signum();
    if out[idx_max] as i64 + step >= 1 {
        out[idx_max] = (out[idx_max] as i64 + step) as u32;
        diff -= step;
    }

    // Step 3: spread the remainder across symbols with enough weight to
    // absorb a one-unit nudge without losing significance, bounded passes.
    let mut pass = 0;
    while diff != 0 && pass < SPREAD_PASSES {
        for (i, &f) in freqs.iter().enumerate() {
            if diff == 0 {
                break;
            }
            if f >= SPREAD_MIN_FREQ {
                let step = diff.signum();
                if out[i] as i64 + step >= 1 {
                    out[i] = (out[i] as i64 + step) as u32;
                    diff -= step;
                }
            }
        }
        pass += 1;
    }

    // Safety net: guarantee the exact-sum contract even on pathological
    // inputs (e.g. an alphabet too small to absorb the full residue within
    // the bounded passes above).
    if diff != 0 {
        out[idx_max] = (out[idx_max] as i64 + diff).max(1) as u32;
    }

    out
}
