//! `shamsi-validation` — field sanitization and validation rules.
//!
//! Every form in the storefront funnels raw input through the same pipeline:
//! sanitize first (strip/truncate characters the field can never contain),
//! then validate (pure, synchronous, never mutates). Required-field emptiness
//! is deliberately *not* a per-field rule; it is checked centrally at submit
//! time against the per-section tables in [`section`].

pub mod field;
pub mod phone;
pub mod rules;
pub mod section;

pub use field::FieldKey;
pub use phone::Country;
pub use rules::{FieldError, FieldOutcome, FieldTable};
pub use section::Section;
