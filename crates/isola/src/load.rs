//! Reading modules from disk.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use isola_ir::Module;

use crate::error::LoadError;

/// Load the module at `path`.
///
/// Files starting with the binary magic are decoded as `.wasm`; anything
/// else is assembled as WebAssembly text first.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Module, LoadError> {
    let bytes = read_all(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let decoded = if isola_wasm::is_binary(&bytes) {
        isola_wasm::decode(&bytes)
    } else {
        match std::str::from_utf8(&bytes) {
            Ok(text) => isola_wasm::decode_text(text),
            // Neither magic nor text: let the binary reader name the problem.
            Err(_) => isola_wasm::decode(&bytes),
        }
    };
    let module = decoded.map_err(|source| LoadError::Decode {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(functions = module.function_count(), "loaded module");
    Ok(module)
}

/// Read the whole file, failing if fewer bytes arrive than its metadata
/// promised.
fn read_all(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let expected = file.metadata()?.len();
    read_exact_len(file, expected)
}

/// Read `reader` to the end. Fewer than `expected` bytes is `UnexpectedEof`.
fn read_exact_len(mut reader: impl Read, expected: u64) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(usize::try_from(expected).unwrap_or(0))
        .map_err(|err| io::Error::new(io::ErrorKind::OutOfMemory, err))?;
    reader.read_to_end(&mut bytes)?;
    if (bytes.len() as u64) < expected {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("read {} of {expected} bytes", bytes.len()),
        ));
    }
    Ok(bytes)
}
