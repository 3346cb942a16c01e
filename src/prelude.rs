pub use crate::{Error, Result};

pub use crate::chunking::*;
pub use crate::combine::*;
pub use crate::geometry::*;
pub use crate::reader::*;

pub use crate::CombineError;
