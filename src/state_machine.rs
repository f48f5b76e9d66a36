//! Per-level state machine (spec §3 "Per-level SM state", §4.3).
//!
//! Six mutually-exclusive 0/1 selectors describing what a given level *is* for the
//! current operation. The identities below are reproduced verbatim from spec §4.3
//! — signs and factorisation are the contract a zero-knowledge circuit over the
//! same computation would also enforce, not just a convenient way to get the
//! right root.

use crate::field::F;

/// The six selectors for one level, after `compute` has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sm {
    pub top: F,
    pub old0: F,
    pub bot: F,
    pub new1: F,
    pub na: F,
    pub upd: F,
}

impl Sm {
    /// The state feeding level 0 (spec §4.3 "Initial state").
    pub fn initial(enabled: bool) -> Self {
        let enabled_f = if enabled { F::from(1u64) } else { F::from(0u64) };
        Sm {
            top: enabled_f,
            old0: F::from(0u64),
            bot: F::from(0u64),
            new1: F::from(0u64),
            na: F::from(1u64) - enabled_f,
            upd: F::from(0u64),
        }
    }

    /// Sum of the four selectors that matter at the deepest level (spec §3, §7
    /// `InvalidTerminalState`): `na + new1 + old0 + upd`.
    pub fn terminal_sum(&self) -> F {
        self.na + self.new1 + self.old0 + self.upd
    }
}

/// Computes the next level's state from the previous one, per spec §4.3.
///
/// - `xor` — the arithmetized XOR of the old- and new-key bits at this level.
/// - `is_old0` — the `isOld0` flag, lifted into `F`.
/// - `lev_ins` — this level's `levIns` selector.
/// - `f0` — the first `fnc` bit (`1` for insert/delete, `0` for update/no-op).
pub fn compute(prev: &Sm, xor: F, is_old0: F, lev_ins: F, f0: F) -> Sm {
    let one = F::from(1u64);

    let aux1 = prev.top * lev_ins;
    let aux2 = aux1 * f0;

    let st_top = prev.top - aux1;
    let st_old0 = aux2 * is_old0;
    let st_new1 = (aux2 - st_old0 + prev.bot) * xor;
    let st_bot = (one - xor) * (aux2 - st_old0 + prev.bot);
    let st_upd = aux1 - aux2;
    let st_na = prev.new1 + prev.old0 + prev.na + prev.upd;

    Sm {
        top: st_top,
        old0: st_old0,
        bot: st_bot,
        new1: st_new1,
        na: st_na,
        upd: st_upd,
    }
}
