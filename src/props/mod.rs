//! Property bags delivered to containers on every update pass.
//!
//! Properties are compared by shallow equality: same key set, each value
//! compared by primitive equality or reference identity. The lifecycle gate
//! uses this comparison to suppress redundant hook dispatches.

mod props;

pub use props::{shallow_equal, PropValue, Props};
