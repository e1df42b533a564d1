//! Control algorithms.

pub mod policy;
