//! Isola Printer
//!
//! Renders an [`isola_ir::Module`] as folded WebAssembly text.
//!
//! # Output Shape
//!
//! - Every instruction prints as an s-expression whose children are the
//!   expressions that ran before it, so unfolding the text gives back the
//!   exact instruction stream that was decoded.
//! - Function, block and `call_indirect` types print inline as
//!   `(param ..) (result ..)`. No type section is emitted.
//! - Items are referenced by index. Functions carry a `$name` only when the
//!   name is a legal identifier and unique within the module.
//! - Float constants print as hexadecimal floats (NaN payloads included) so a
//!   reparse restores the exact bits.
//!
//! # Modules
//!
//! - [`emitter`]: Output abstraction for string and file output

pub mod emitter;
mod error;
mod float;
mod names;
mod printer;

pub use emitter::{Emitter, FileEmitter, StringEmitter, INDENT_WIDTH};
pub use error::PrintError;
pub use printer::{print_module, print_to_string};
