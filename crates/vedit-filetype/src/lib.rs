//! File type detection for `vedit`.
//!
//! [`Classifier`] maps a path to a canonical [`TypeKey`] through a fixed
//! cascade: the extension table, the interpreter directive on the first
//! line, a null-byte scan, an external MIME probe, binary magic numbers, and
//! finally plain text. Each step that cannot decide hands over to the next.

mod classify;
mod probe;
mod shebang;
mod type_key;

pub use classify::{Classifier, DetectionSource, TypeClassification, classify};
pub use probe::{
    ContentProbe, FileCommandProbe, MimeClass, NoContentProbe, SNIFF_LEN, classify_mime,
    contains_null_byte, has_binary_signature, read_head,
};
pub use shebang::{read_first_line, shebang_type};
pub use type_key::{TypeKey, TypeKeyParseError, extension_of};

#[cfg(test)]
mod tests;
