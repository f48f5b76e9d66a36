//! Core engine for a sparse Merkle tree update processor compatible with the
//! iden3 circomlib SMT circuits.
//!
//! Given a single insert, update, or delete operation plus its sibling path, the
//! engine computes both the old root implied by that path and the new root
//! produced by applying the operation, enforcing the same arithmetic constraints
//! a zero-knowledge circuit over the same computation would enforce. Building or
//! persisting the tree itself, deriving a sibling path from storage, Poseidon,
//! field arithmetic, and proof generation/verification are all out of scope — see
//! `SPEC_FULL.md`.

pub mod engine;
pub mod error;
pub mod field;
pub mod level;
pub mod levins;
pub mod path;
pub mod poseidon;
pub mod state_machine;
pub mod testvec;

pub use engine::{process, SmtUpdate};
pub use error::EngineError;
pub use field::F;
pub use poseidon::PoseidonHasher;

/// circomlib's SMT depth: 254 bits, one per level of the tree (spec §6).
pub const CIRCOMLIB_DEPTH: usize = path::CIRCOMLIB_DEPTH;
