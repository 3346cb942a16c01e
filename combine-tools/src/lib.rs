pub mod utils;
pub use rastercomb::{Error, Result};

pub mod proc;
pub use proc::*;

pub mod cli;
