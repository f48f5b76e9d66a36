//! Key bit decomposition (spec §3 Path, §6 endianness contract).
//!
//! For circomlib compatibility the path is LSB-first: `b[i] = (key >> i) & 1`.
//! `n2b_old[i]` and `n2b_new[i]` always refer to the same bit index `i`, which is
//! what lets `state_machine::Sm` and `level::Level` treat "this level" as a single
//! coordinate shared by both keys.

use crate::field::{bits_le, F};

/// circomlib's SMT depth: 254 bits, one per level of the tree.
pub const CIRCOMLIB_DEPTH: usize = 254;

/// The LSB-first bit path of `key`, truncated/padded to `n_levels` bits.
pub fn key_path(key: &F, n_levels: usize) -> Vec<bool> {
    bits_le(key, n_levels)
}

/// A single path bit, lifted back into `F` (0 or 1) for use in field identities.
pub fn bit_as_field(bit: bool) -> F {
    if bit {
        F::from(1u64)
    } else {
        F::from(0u64)
    }
}
