//! Rendering of command output.

pub mod table;
