#![deny(unsafe_code)]

// not concurrent
pub mod non_concurrent;

// logger setup for binaries and tests
pub mod logging;

pub use non_concurrent::avl_tree::{AvlTree, InvariantViolation, Iter, Key};
