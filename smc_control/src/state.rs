//! State machine module root.

pub mod mode;
