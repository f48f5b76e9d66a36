//! The native field and the arithmetized primitives every other module builds on.
//!
//! `F` is the BN254 scalar field supplied by `ark-bn254`/`ark-ff`; this module does
//! not reimplement field arithmetic, it only gives names to the handful of
//! polynomial shapes the rest of the engine relies on (switchers, XOR, AND), kept
//! in the exact factored form the circomlib circuits use so root computations stay
//! bit-compatible with a real proof of the same operation.

use ark_bn254::Fr;
use ark_ff::{AdditiveGroup, BigInteger, PrimeField};
use num_bigint::BigUint;

/// The native field: the BN254 scalar field order.
pub type F = Fr;

/// Lifts a `u64` into `F`.
pub fn from_u64(n: u64) -> F {
    F::from(n)
}

/// Parses a decimal string into `F`, rejecting values at or above the field
/// modulus (spec `InputOutOfField`).
pub fn from_decimal(s: &str) -> Option<F> {
    let n = BigUint::parse_bytes(s.as_bytes(), 10)?;
    from_biguint(&n)
}

/// Converts a `BigUint` into `F`, returning `None` if it is not a canonical
/// representative (i.e. it is `>=` the field modulus).
pub fn from_biguint(n: &BigUint) -> Option<F> {
    let bigint = <F as PrimeField>::BigInt::try_from(n.clone()).ok()?;
    F::from_bigint(bigint)
}

/// `true` iff `x` is the additive identity.
pub fn is_zero(x: &F) -> bool {
    *x == F::ZERO
}

/// Little-endian bits of `x`, truncated/zero-padded to `n_bits`.
pub fn bits_le(x: &F, n_bits: usize) -> Vec<bool> {
    let repr = x.into_bigint();
    (0..n_bits).map(|i| repr.get_bit(i)).collect()
}

/// Arithmetized XOR: `a + b - 2ab`. Well-defined for any `a, b` in `{0, 1} ⊂ F`.
pub fn xor(a: &F, b: &F) -> F {
    *a + *b - from_u64(2) * *a * *b
}

/// Arithmetized AND: `a * b`.
pub fn and(a: &F, b: &F) -> F {
    *a * *b
}

/// Fan-in AND over more than two terms, built as a balanced binary tree of `and`
/// (matching the source's `MultiAND`, which exists purely so each constraint has
/// bounded fan-in).
pub fn multi_and(terms: &[F]) -> F {
    match terms {
        [] => F::from(1u64),
        [single] => *single,
        terms => {
            let mid = terms.len() / 2;
            and(&multi_and(&terms[..mid]), &multi_and(&terms[mid..]))
        }
    }
}

/// One-of-two mux: `sel * R + (1 - sel) * L`. `sel` MUST be 0 or 1.
pub fn mux(sel: &F, l: &F, r: &F) -> F {
    *sel * *r + (F::from(1u64) - *sel) * *l
}

/// Two-output switcher: swaps `(L, R)` to `(R, L)` when `sel = 1`, realised as
/// `aux = (R - L) * sel; (L + aux, R - aux)` — the factorisation the spec calls out
/// as load-bearing for the zero-knowledge circuit this mirrors.
pub fn switch(sel: &F, l: &F, r: &F) -> (F, F) {
    let aux = (*r - *l) * *sel;
    (*l + aux, *r - aux)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_truth_table() {
        let z = F::ZERO;
        let o = F::from(1u64);
        assert_eq!(xor(&z, &z), z);
        assert_eq!(xor(&z, &o), o);
        assert_eq!(xor(&o, &z), o);
        assert_eq!(xor(&o, &o), z);
    }

    #[test]
    fn switch_identity_and_swap() {
        let l = F::from(10u64);
        let r = F::from(20u64);
        assert_eq!(switch(&F::ZERO, &l, &r), (l, r));
        assert_eq!(switch(&F::from(1u64), &l, &r), (r, l));
    }

    #[test]
    fn multi_and_matches_fold() {
        let terms = [F::from(1u64), F::from(1u64), F::from(1u64), F::from(0u64)];
        assert_eq!(multi_and(&terms), F::ZERO);
        let all_ones = [F::from(1u64); 5];
        assert_eq!(multi_and(&all_ones), F::from(1u64));
    }

    #[test]
    fn from_decimal_rejects_out_of_field() {
        assert!(from_decimal("0").is_some());
        assert!(from_decimal("111").is_some());
        // the BN254 scalar field modulus itself is not a canonical representative
        let modulus =
            "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        assert!(from_decimal(modulus).is_none());
    }

    #[test]
    fn bits_le_round_trip() {
        let x = from_u64(0b1011);
        let bits = bits_le(&x, 8);
        assert_eq!(
            bits,
            vec![true, true, false, true, false, false, false, false]
        );
    }
}
