//! The `isolate` command: copy one function into a module of its own.

use std::io::Write;
use std::path::{Path, PathBuf};

use isola_ir::Module;

use super::dump::write_text;
use super::load_or_exit;

/// Output format of `isolate`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Emit {
    /// WebAssembly text.
    #[default]
    Wat,
    /// Binary module.
    Wasm,
}

impl Emit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wat" => Some(Emit::Wat),
            "wasm" => Some(Emit::Wasm),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsolateOptions {
    pub output: Option<PathBuf>,
    pub emit: Emit,
}

/// Parse the flags following `isolate <file> <index>`.
pub fn parse_isolate_options(args: &[String]) -> Result<IsolateOptions, String> {
    let mut options = IsolateOptions::default();
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "-o" {
            let Some(path) = args.get(i + 1) else {
                return Err("-o needs a path".to_string());
            };
            options.output = Some(PathBuf::from(path));
            i += 2;
            continue;
        }
        if let Some(format) = arg.strip_prefix("--emit=") {
            options.emit =
                Emit::parse(format).ok_or_else(|| format!("unknown emit format '{format}'"))?;
        } else {
            return Err(format!("unknown option '{arg}'"));
        }
        i += 1;
    }
    Ok(options)
}

/// Isolate function `index` of the module at `path` and write the result.
pub fn isolate_file(path: &str, index: &str, options: &IsolateOptions) {
    let Ok(index) = index.parse::<usize>() else {
        eprintln!("error: '{index}' is not a function index");
        std::process::exit(1);
    };
    let module = load_or_exit(path);
    let isolated = match crate::isolate(&module, index) {
        Ok(isolated) => isolated,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    drop(module);

    if let Err(err) = write(&isolated, options) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn write(module: &Module, options: &IsolateOptions) -> Result<(), String> {
    match options.emit {
        Emit::Wat => match options.output.as_deref() {
            Some(output) => write_text(module, output).map_err(|err| describe(output, &err)),
            None => {
                let text = crate::render(Some(module));
                if text.is_empty() {
                    return Err("isolated module cannot be printed".to_string());
                }
                print!("{text}");
                Ok(())
            }
        },
        Emit::Wasm => {
            let bytes = isola_wasm::assemble(module).map_err(|err| err.to_string())?;
            match options.output.as_deref() {
                Some(output) => std::fs::write(output, bytes).map_err(|err| describe(output, &err)),
                None => std::io::stdout()
                    .lock()
                    .write_all(&bytes)
                    .map_err(|err| err.to_string()),
            }
        }
    }
}

fn describe(output: &Path, err: &std::io::Error) -> String {
    format!("cannot write '{}': {err}", output.display())
}
