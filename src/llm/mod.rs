//! Generative text backends.
//!
//! The analysis core only ever talks to a [`GenerativeBackend`]; which
//! provider sits behind it is decided once from configuration.

mod client;
pub mod decode;

pub use client::{
    build_backend, BackendHandle, GenerateOptions, GenerativeBackend, LlmConfig, LlmError,
    LlmProvider,
};
pub use decode::{decode_object, decode_value, outermost_span, DecodeError};

#[cfg(test)]
pub(crate) use client::testing;
