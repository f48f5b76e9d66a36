//! Per-level root recomputation (spec §4.4).
//!
//! Consumes one level's SM selectors plus its sibling and the child roots from the
//! level below, and produces `(oldRoot_i, newRoot_i)`. Every term is gated by
//! exactly one selector so the whole level collapses to a single algebraic sum —
//! that's what makes it expressible as one circuit row per level.

use crate::field::switch;
use crate::field::F;
use crate::poseidon::PoseidonHasher;
use crate::state_machine::Sm;

/// `(oldRoot_i, newRoot_i)` for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub old_root: F,
    pub new_root: F,
}

/// Recomputes one level, per spec §4.4.
///
/// `old_child`/`new_child` are the roots produced by the level below (zero at the
/// deepest level, spec §3). `newlrbit` is the new-key's bit at this level.
#[allow(clippy::too_many_arguments)]
pub fn compute(
    sm: &Sm,
    hasher: &PoseidonHasher,
    sibling: F,
    old1leaf: F,
    new1leaf: F,
    newlrbit: F,
    old_child: F,
    new_child: F,
) -> Level {
    // Old side.
    let (old_l, old_r) = switch(&newlrbit, &old_child, &sibling);
    let old_proof_hash = hasher.h_node(&old_l, &old_r);
    let old_root = old1leaf * (sm.bot + sm.new1 + sm.upd) + old_proof_hash * sm.top;

    // New side.
    let new_sw_l = new_child * (sm.top + sm.bot) + new1leaf * sm.new1;
    let new_sw_r = sibling * sm.top + old1leaf * sm.new1;
    let (new_out_l, new_out_r) = switch(&newlrbit, &new_sw_l, &new_sw_r);
    let new_proof_hash = hasher.h_node(&new_out_l, &new_out_r);
    let new_root = new_proof_hash * (sm.top + sm.bot + sm.new1) + new1leaf * (sm.old0 + sm.upd);

    Level { old_root, new_root }
}
