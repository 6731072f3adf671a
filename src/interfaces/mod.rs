//! User-facing front ends.

pub mod repl;
