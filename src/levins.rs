//! The LevIns detector (spec §4.2).
//!
//! Identifies the unique level at which an insert must place its new branch: the
//! shallowest level whose sibling, and every deeper sibling, is zero.

use crate::error::EngineError;
use crate::field::{is_zero, F};

/// Computes `levIns[0..n_levels)`, one-hot over the shallowest all-zero-below
/// level, per spec §4.2.
///
/// # Errors
/// Returns [`EngineError::NonZeroLastSibling`] if `enabled` and
/// `siblings[n_levels - 1] != 0` (spec precondition).
///
/// Callers MUST ensure `siblings.len() >= 2`; the caller-facing depth check lives
/// in `engine::process` (spec `InvalidDepth`), since a slice of length < 2 can't
/// reach this function without that check already having run.
pub fn compute(siblings: &[F], enabled: bool) -> Result<Vec<F>, EngineError> {
    let n = siblings.len();
    debug_assert!(n >= 2, "levins::compute requires at least 2 levels");

    if enabled && !is_zero(&siblings[n - 1]) {
        return Err(EngineError::NonZeroLastSibling);
    }

    let one = F::from(1u64);
    let mut lev_ins = vec![F::from(0u64); n];
    let mut done = vec![F::from(0u64); n];

    lev_ins[n - 1] = if is_zero(&siblings[n - 2]) {
        F::from(0u64)
    } else {
        one
    };
    done[n - 2] = lev_ins[n - 1];

    for i in (1..n - 1).rev() {
        let sibling_nonzero = if is_zero(&siblings[i - 1]) {
            F::from(0u64)
        } else {
            one
        };
        lev_ins[i] = (one - done[i]) * sibling_nonzero;
        done[i - 1] = lev_ins[i] + done[i];
    }

    lev_ins[0] = one - done[0];

    Ok(lev_ins)
}
