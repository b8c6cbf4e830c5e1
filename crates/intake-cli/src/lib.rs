//! Library side of the `sheet-intake` command.

pub mod edits;
pub mod logging;
