//! `shamsi-profile` — section-scoped profile editing.
//!
//! The account pages render a [`record::UserRecord`] merged from the auth and
//! profile services with fixed per-field ownership. Editing happens one
//! section at a time through [`editor::SectionEditor`]; the completion
//! percentage ([`completion`]) is derived from saved values only.

pub mod completion;
pub mod editor;
pub mod notice;
pub mod record;

pub use completion::completion;
pub use editor::{PreferencesDraft, SectionEditor};
pub use notice::{Notice, NoticeKind, NOTICE_SECONDS};
pub use record::{reconcile, UserRecord};
