//! Input/output helpers.
//!
//! - CSV decoding (`decode`)
//! - cell coercion into typed rows (`normalize`)
//! - state exports (JSON/CSV) (`export`)

pub mod decode;
pub mod export;
pub mod normalize;

pub use decode::*;
pub use export::*;
pub use normalize::*;
