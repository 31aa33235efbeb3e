pub mod error;
pub mod flags;
pub mod shell;

pub mod core;
pub mod parse;
pub mod path;
pub mod process;
