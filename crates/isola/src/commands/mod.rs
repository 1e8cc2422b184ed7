//! Command handlers for the `isola` CLI.
//!
//! Each submodule implements one command. Handlers report failures on
//! stderr and exit with status 1.

use std::path::Path;

use isola_ir::Module;

use crate::LoadError;

mod dump;
mod info;
mod isolate;

pub use dump::dump_file;
pub use info::info_file;
pub use isolate::{isolate_file, parse_isolate_options, Emit, IsolateOptions};

/// Load a module or exit with a readable message.
fn load_or_exit(path: &str) -> Module {
    match crate::load(Path::new(path)) {
        Ok(module) => module,
        Err(err) => {
            let msg = match &err {
                LoadError::Io { source, .. } => match source.kind() {
                    std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                    std::io::ErrorKind::PermissionDenied => {
                        format!("permission denied reading '{path}'")
                    }
                    _ => format!("error: {err}"),
                },
                LoadError::Decode { .. } => format!("error: {err}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
