//! The `dump` command: print a whole module as text.

use std::path::Path;

use isola_print::{print_module, FileEmitter};

use super::load_or_exit;

/// Print the module between banner lines on stdout, or write the bare text
/// to `output`.
pub fn dump_file(path: &str, output: Option<&Path>) {
    let module = load_or_exit(path);
    let result = match output {
        Some(output) => write_text(&module, output),
        None => crate::dump(&module, &mut std::io::stdout().lock()),
    };
    if let Err(err) = result {
        eprintln!("error: cannot print '{path}': {err}");
        std::process::exit(1);
    }
}

pub(super) fn write_text(module: &isola_ir::Module, output: &Path) -> std::io::Result<()> {
    let mut emitter = FileEmitter::new(output)?;
    print_module(module, &mut emitter)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    emitter.finish()
}
