//! Fatal error kinds (spec §7). All are fatal: no partial results, no retries, and
//! no intermediate component recovers from a contract violation. Most are raised
//! by `engine::process`; `InputOutOfField` is raised earlier, wherever untrusted
//! decimal input is parsed into a field element (`testvec::load`, the CLI's `run`
//! subcommand) — by the time a value reaches `engine::process` it is already a
//! validated `F`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid fnc selector: ({f0}, {f1}) is not one of (0,0), (1,0), (0,1), (1,1)")]
    InvalidFnc { f0: String, f1: String },

    #[error("invalid depth: n_levels ({n_levels}) must equal siblings.len() ({siblings_len}) and be >= 2")]
    InvalidDepth {
        n_levels: usize,
        siblings_len: usize,
    },

    #[error("non-zero last sibling for an enabled operation")]
    NonZeroLastSibling,

    #[error("invalid terminal state: na + new1 + old0 + upd = {sum} (expected 1)")]
    InvalidTerminalState { sum: String },

    #[error("old root mismatch: supplied {supplied}, implied by siblings {implied}")]
    OldRootMismatch { supplied: String, implied: String },

    #[error("key mismatch on update: oldKey != newKey")]
    KeyMismatchOnUpdate,

    #[error("scalar out of field range: {field} = {value}")]
    InputOutOfField { field: String, value: String },
}
