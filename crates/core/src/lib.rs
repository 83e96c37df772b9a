//! Pure domain logic for the shopkit back-office.
//!
//! No I/O lives here: the tree algorithms, slug derivation, and storage URL
//! parsing all operate on in-memory values so they can be unit-tested without
//! a database or network.

pub mod error;
pub mod slug;
pub mod storage;
pub mod tree;
pub mod types;
