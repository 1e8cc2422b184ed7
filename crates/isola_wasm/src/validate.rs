//! Validation through the reference text and binary toolchain.
//!
//! A module is printed, assembled with `wat` and checked by
//! `wasmparser::Validator` with its default feature set.

use isola_ir::Module;
use wasmparser::Validator;

use crate::error::DecodeError;

/// Binary encoding of `module`.
pub fn assemble(module: &Module) -> Result<Vec<u8>, DecodeError> {
    let text = isola_print::print_to_string(module)?;
    Ok(wat::parse_str(&text)?)
}

/// `true` if `module` is valid WebAssembly.
pub fn validate(module: &Module) -> bool {
    let bytes = match assemble(module) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(%err, "module does not assemble");
            return false;
        }
    };
    match Validator::new().validate_all(&bytes) {
        Ok(_) => true,
        Err(err) => {
            tracing::debug!(%err, "module is invalid");
            false
        }
    }
}
