//! Data models

pub mod category;
pub mod impact;
pub mod record;

pub use category::*;
pub use impact::*;
pub use record::*;
