//! Type definitions for batched calls

mod call;

pub use call::{Call, TypedCall};
