//! Text rendering of modules and single function bodies.

use std::fmt;
use std::io::{self, Write};

use isola_ir::Module;

use crate::isolate::isolate;

/// Header line written by [`dump`] above the module text.
pub const DUMP_BANNER: &str = "===== module text =====";

/// Text owned by the caller, independent of the module it came from.
///
/// Empty when rendering failed or there was nothing to render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderedText(String);

impl RenderedText {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for RenderedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render `module` as WebAssembly text.
///
/// An absent module renders as empty text. So does a module the printer
/// rejects; the reason is logged.
pub fn render(module: Option<&Module>) -> RenderedText {
    let Some(module) = module else {
        return RenderedText::default();
    };
    match isola_print::print_to_string(module) {
        Ok(text) => RenderedText(text),
        Err(err) => {
            tracing::warn!(%err, "module cannot be printed");
            RenderedText::default()
        }
    }
}

/// Write the module text to `out` between banner lines.
pub fn dump(module: &Module, out: &mut impl Write) -> io::Result<()> {
    let text = isola_print::print_to_string(module)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    writeln!(out)?;
    writeln!(out, "{DUMP_BANNER}")?;
    write!(out, "{text}")?;
    writeln!(out, "{}", "=".repeat(DUMP_BANNER.len()))?;
    writeln!(out)?;
    out.flush()
}

/// Text of a module holding only function `index`.
///
/// Empty when the index is out of range or names an import.
pub fn function_body_text(module: &Module, index: usize) -> RenderedText {
    match isolate(module, index) {
        Ok(isolated) => {
            let text = render(Some(&isolated));
            drop(isolated);
            text
        }
        Err(err) => {
            tracing::debug!(%err, "no body text");
            RenderedText::default()
        }
    }
}
