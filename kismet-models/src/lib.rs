//! Kismet Models - wire value model, decoder, and command payloads.
//!
//! The Kismet server serializes every tracked element as a msgpack
//! `[type, payload]` pair. This crate owns that model: the closed set of
//! tracker type tags, the decoder that strips tags into a [`PlainValue`]
//! tree, and the serde payloads for the server's `.cmd` endpoints.

pub mod commands;
pub mod decode;
pub mod fields;
pub mod tracker;
pub mod value;

// Re-export key types
pub use decode::{decode_bytes, simplify};
pub use fields::{FieldSpec, RegexFilter};
pub use tracker::{TaggedValue, TrackerType};
pub use value::PlainValue;
