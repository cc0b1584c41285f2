//! Record model.
//!
//! A corpus is a stream of JSON objects, one per line. [`Record`] gives typed
//! access to the fields the filters read and keeps everything else untouched;
//! [`Annotation`] is what the filters write back under `info`.

mod annotation;
mod record;

pub use annotation::*;
pub use record::*;
