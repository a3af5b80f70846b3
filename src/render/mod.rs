//! Output rendering for analysis reports and the condition catalog.

pub(crate) mod json;
pub(crate) mod markdown;
