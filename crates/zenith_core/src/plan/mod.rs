//! AI-generated annual plan import.
//!
//! The generator itself runs outside core; this module only validates its
//! structured output and turns accepted drafts into goals.

pub mod draft;
