//! The top-level driver (spec §4.5): validates `fnc`, runs the forward SM pass,
//! the backward Level pass, and the top switcher, then checks the supplied old
//! root and key-equality constraints before returning the new root.

use tracing::{debug, trace, warn};

use crate::error::EngineError;
use crate::field::{self, switch, F};
use crate::level::{self, Level};
use crate::levins;
use crate::path::{bit_as_field, key_path};
use crate::poseidon::PoseidonHasher;
use crate::state_machine::{self, Sm};

/// One operation's full set of inputs (spec §6 "Primary entry point").
///
/// `n_levels` MUST equal `siblings.len()` and MUST be `>= 2` (the `LevIns`
/// recurrence references `siblings[n_levels - 2]`).
///
/// `is_old0` asserts that the key-slot being inserted was empty (insert only);
/// for update and delete it MUST be `false` — the engine does not independently
/// re-derive this from the siblings, it trusts the caller the same way the
/// circuit trusts its witness.
#[derive(Debug, Clone)]
pub struct SmtUpdate {
    pub n_levels: usize,
    pub old_root: F,
    pub siblings: Vec<F>,
    pub old_key: F,
    pub old_value: F,
    pub is_old0: bool,
    pub new_key: F,
    pub new_value: F,
    pub fnc: (F, F),
}

fn is_equal(a: &F, b: &F) -> F {
    if a == b {
        F::from(1u64)
    } else {
        F::from(0u64)
    }
}

/// Runs one SMT update (insert, update, delete, or no-op) and returns the new
/// root, per spec §4.5.
pub fn process(input: &SmtUpdate, hasher: &PoseidonHasher) -> Result<F, EngineError> {
    let (f0, f1) = input.fnc;
    let zero = F::from(0u64);
    let one = F::from(1u64);
    let valid_fnc = [(zero, zero), (one, zero), (zero, one), (one, one)].contains(&(f0, f1));
    if !valid_fnc {
        warn!(?f0, ?f1, "rejecting invalid fnc selector");
        return Err(EngineError::InvalidFnc {
            f0: f0.to_string(),
            f1: f1.to_string(),
        });
    }

    if input.n_levels != input.siblings.len() || input.n_levels < 2 {
        warn!(
            n_levels = input.n_levels,
            siblings_len = input.siblings.len(),
            "rejecting invalid depth"
        );
        return Err(EngineError::InvalidDepth {
            n_levels: input.n_levels,
            siblings_len: input.siblings.len(),
        });
    }

    let enabled = f0 + f1 - f0 * f1;
    let enabled_bool = enabled == one;
    let op = match (f0 == one, f1 == one) {
        (false, false) => "no-op",
        (true, false) => "insert",
        (false, true) => "update",
        (true, true) => "delete",
    };
    let _span = tracing::debug_span!("smt_update", n_levels = input.n_levels, op).entered();
    debug!("processing SMT update");

    let hash1_old = hasher.h_leaf(&input.old_key, &input.old_value);
    let hash1_new = hasher.h_leaf(&input.new_key, &input.new_value);

    let n2b_old = key_path(&input.old_key, input.n_levels);
    let n2b_new = key_path(&input.new_key, input.n_levels);

    let lev_ins = levins::compute(&input.siblings, enabled_bool)?;

    let xors: Vec<F> = n2b_old
        .iter()
        .zip(n2b_new.iter())
        .map(|(a, b)| field::xor(&bit_as_field(*a), &bit_as_field(*b)))
        .collect();

    let is_old0_f = if input.is_old0 { one } else { zero };

    // Forward pass: compute the SM selectors level by level, root to leaf.
    let mut sm: Vec<Sm> = Vec::with_capacity(input.n_levels);
    let mut prev = Sm::initial(enabled_bool);
    for i in 0..input.n_levels {
        let next = state_machine::compute(&prev, xors[i], is_old0_f, lev_ins[i], f0);
        trace!(level = i, ?next, "sm transition");
        sm.push(next);
        prev = next;
    }

    let terminal = sm[input.n_levels - 1].terminal_sum();
    if terminal != one {
        warn!(sum = %terminal, "rejecting invalid terminal state");
        return Err(EngineError::InvalidTerminalState {
            sum: terminal.to_string(),
        });
    }

    // Backward pass: recompute (oldRoot_i, newRoot_i) leaf to root.
    let mut levels: Vec<Level> = vec![
        Level {
            old_root: zero,
            new_root: zero,
        };
        input.n_levels
    ];
    for i in (0..input.n_levels).rev() {
        let (old_child, new_child) = if i == input.n_levels - 1 {
            (zero, zero)
        } else {
            (levels[i + 1].old_root, levels[i + 1].new_root)
        };
        let newlrbit = bit_as_field(n2b_new[i]);
        levels[i] = level::compute(
            &sm[i],
            hasher,
            input.siblings[i],
            hash1_old,
            hash1_new,
            newlrbit,
            old_child,
            new_child,
        );
        trace!(level = i, old_root = %levels[i].old_root, new_root = %levels[i].new_root, "level recomputed");
    }

    let (top_l, top_r) = switch(&(f0 * f1), &levels[0].old_root, &levels[0].new_root);

    if enabled_bool && input.old_root != top_l {
        warn!(supplied = %input.old_root, implied = %top_l, "old root mismatch");
        return Err(EngineError::OldRootMismatch {
            supplied: input.old_root.to_string(),
            implied: top_l.to_string(),
        });
    }

    let new_root = enabled * (top_r - input.old_root) + input.old_root;

    let are_keys_equal = is_equal(&input.old_key, &input.new_key);
    let keys_ok = field::multi_and(&[one - f0, f1, one - are_keys_equal]);
    if keys_ok != zero {
        warn!("rejecting update across differing keys");
        return Err(EngineError::KeyMismatchOnUpdate);
    }

    debug!(new_root = %new_root, "SMT update complete");
    Ok(new_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::from_decimal;

    fn dec(s: &str) -> F {
        from_decimal(s).unwrap()
    }

    fn zero_siblings(n: usize) -> Vec<F> {
        vec![F::from(0u64); n]
    }

    #[test]
    fn insert_into_empty_tree_matches_seed_scenario() {
        let hasher = PoseidonHasher::new();
        let input = SmtUpdate {
            n_levels: 10,
            old_root: F::from(0u64),
            siblings: zero_siblings(10),
            old_key: F::from(0u64),
            old_value: F::from(0u64),
            is_old0: true,
            new_key: F::from(111u64),
            new_value: F::from(222u64),
            fnc: (F::from(1u64), F::from(0u64)),
        };
        let new_root = process(&input, &hasher).unwrap();
        assert_eq!(
            new_root,
            dec("9308772482099879945566979599408036177864352098141198065063141880905857869998")
        );
    }

    #[test]
    fn disabled_is_identity() {
        let hasher = PoseidonHasher::new();
        let old_root = F::from(42u64);
        let input = SmtUpdate {
            n_levels: 10,
            old_root,
            siblings: zero_siblings(10),
            old_key: F::from(7u64),
            old_value: F::from(8u64),
            is_old0: false,
            new_key: F::from(9u64),
            new_value: F::from(10u64),
            fnc: (F::from(0u64), F::from(0u64)),
        };
        let new_root = process(&input, &hasher).unwrap();
        assert_eq!(new_root, old_root);
    }

    #[test]
    fn rejects_update_across_differing_keys() {
        let hasher = PoseidonHasher::new();
        let input = SmtUpdate {
            n_levels: 10,
            old_root: F::from(0u64),
            siblings: zero_siblings(10),
            old_key: F::from(1u64),
            old_value: F::from(0u64),
            is_old0: false,
            new_key: F::from(2u64),
            new_value: F::from(0u64),
            fnc: (F::from(0u64), F::from(1u64)),
        };
        let err = process(&input, &hasher).unwrap_err();
        assert!(matches!(err, EngineError::KeyMismatchOnUpdate));
    }

    #[test]
    fn rejects_invalid_fnc() {
        let hasher = PoseidonHasher::new();
        let input = SmtUpdate {
            n_levels: 10,
            old_root: F::from(0u64),
            siblings: zero_siblings(10),
            old_key: F::from(0u64),
            old_value: F::from(0u64),
            is_old0: false,
            new_key: F::from(0u64),
            new_value: F::from(0u64),
            fnc: (F::from(2u64), F::from(0u64)),
        };
        let err = process(&input, &hasher).unwrap_err();
        assert!(matches!(err, EngineError::InvalidFnc { .. }));
    }

    #[test]
    fn rejects_short_depth() {
        let hasher = PoseidonHasher::new();
        let input = SmtUpdate {
            n_levels: 1,
            old_root: F::from(0u64),
            siblings: zero_siblings(1),
            old_key: F::from(0u64),
            old_value: F::from(0u64),
            is_old0: false,
            new_key: F::from(0u64),
            new_value: F::from(0u64),
            fnc: (F::from(0u64), F::from(0u64)),
        };
        let err = process(&input, &hasher).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDepth { .. }));
    }

    #[test]
    fn update_then_delete_round_trips_to_insert_root() {
        let hasher = PoseidonHasher::new();
        let siblings = zero_siblings(10);

        let inserted_root = process(
            &SmtUpdate {
                n_levels: 10,
                old_root: F::from(0u64),
                siblings: siblings.clone(),
                old_key: F::from(0u64),
                old_value: F::from(0u64),
                is_old0: true,
                new_key: F::from(111u64),
                new_value: F::from(222u64),
                fnc: (F::from(1u64), F::from(0u64)),
            },
            &hasher,
        )
        .unwrap();

        let updated_root = process(
            &SmtUpdate {
                n_levels: 10,
                old_root: inserted_root,
                siblings: siblings.clone(),
                old_key: F::from(111u64),
                old_value: F::from(222u64),
                is_old0: false,
                new_key: F::from(111u64),
                new_value: F::from(20u64),
                fnc: (F::from(0u64), F::from(1u64)),
            },
            &hasher,
        )
        .unwrap();
        assert_ne!(updated_root, inserted_root);

        let deleted_root = process(
            &SmtUpdate {
                n_levels: 10,
                old_root: updated_root,
                siblings,
                old_key: F::from(111u64),
                old_value: F::from(20u64),
                is_old0: false,
                new_key: F::from(111u64),
                new_value: F::from(0u64),
                fnc: (F::from(1u64), F::from(1u64)),
            },
            &hasher,
        )
        .unwrap();
        assert_eq!(deleted_root, inserted_root);
    }

    #[test]
    fn update_idempotence() {
        let hasher = PoseidonHasher::new();
        let siblings = zero_siblings(10);
        let inserted_root = process(
            &SmtUpdate {
                n_levels: 10,
                old_root: F::from(0u64),
                siblings: siblings.clone(),
                old_key: F::from(0u64),
                old_value: F::from(0u64),
                is_old0: true,
                new_key: F::from(111u64),
                new_value: F::from(222u64),
                fnc: (F::from(1u64), F::from(0u64)),
            },
            &hasher,
        )
        .unwrap();

        let same_root = process(
            &SmtUpdate {
                n_levels: 10,
                old_root: inserted_root,
                siblings,
                old_key: F::from(111u64),
                old_value: F::from(222u64),
                is_old0: false,
                new_key: F::from(111u64),
                new_value: F::from(222u64),
                fnc: (F::from(0u64), F::from(1u64)),
            },
            &hasher,
        )
        .unwrap();
        assert_eq!(same_root, inserted_root);
    }
}
