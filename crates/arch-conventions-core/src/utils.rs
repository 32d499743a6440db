//! Utility functions for source import.

pub mod attributes;
pub mod paths;

#[doc(inline)]
pub use attributes::{attribute_names, derive_names, has_cfg_test};
#[doc(inline)]
pub use paths::{last_segment, path_to_string, qualify};
