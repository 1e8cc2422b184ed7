//! The `info` command: validate a module and list its functions.

use isola_ir::Module;

use super::load_or_exit;

/// Print validity and one line per function.
pub fn info_file(path: &str) {
    let module = load_or_exit(path);
    print!("{}", describe(path, &module));
}

/// Listing shown by `info`, one line per function after the header.
fn describe(path: &str, module: &Module) -> String {
    use std::fmt::Write;

    let validity = if crate::validate(Some(module)) {
        "valid"
    } else {
        "invalid"
    };
    let count = module.function_count();
    let plural = if count == 1 { "" } else { "s" };
    let mut out = format!("{path}: {validity}, {count} function{plural}\n");
    for (index, function) in module.functions().iter().enumerate() {
        let name = if function.name().is_empty() {
            "-"
        } else {
            function.name()
        };
        let _ = write!(out, "  {index:>4}  {name}  {}", function.signature());
        if let Some(import) = function.import() {
            let _ = write!(out, "  (import \"{}\" \"{}\")", import.module, import.field);
        }
        out.push('\n');
    }
    out
}
