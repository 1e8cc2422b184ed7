//! Isola WebAssembly Frontend
//!
//! Turns WebAssembly binaries (and text, through `wat`) into
//! [`isola_ir::Module`]s and checks modules against the validation rules.
//!
//! - [`decode`] / [`decode_text`]: build a module, folding the stack-machine
//!   instruction stream of every function into expression trees
//! - [`validate`]: `true` if a module is valid WebAssembly
//! - [`assemble`]: binary encoding of a module
//!
//! Decoding does not validate. A module that decodes is structurally
//! sound (every id refers to its own arena) but may still be rejected by
//! [`validate`].

mod builder;
mod decode;
mod error;
mod validate;

pub use decode::{decode, decode_text, is_binary};
pub use error::DecodeError;
pub use validate::{assemble, validate};
