//! Identifiers and string literals.

use isola_ir::Module;
use rustc_hash::FxHashMap;

/// `true` if `name` can follow `$` in an identifier.
pub(crate) fn is_id(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'/'
                        | b':'
                        | b'<'
                        | b'='
                        | b'>'
                        | b'?'
                        | b'@'
                        | b'\\'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}

/// Printable function identifiers, by function index.
///
/// A name is kept only if it is a legal identifier used by exactly one
/// function. Everything else prints without an identifier.
pub(crate) struct FuncIds<'m> {
    ids: Vec<Option<&'m str>>,
}

impl<'m> FuncIds<'m> {
    pub(crate) fn new(module: &'m Module) -> Self {
        let mut uses: FxHashMap<&str, usize> = FxHashMap::default();
        for function in module.functions() {
            *uses.entry(function.name()).or_default() += 1;
        }
        let ids = module
            .functions()
            .iter()
            .map(|f| {
                let name = f.name();
                (is_id(name) && uses.get(name) == Some(&1)).then_some(name)
            })
            .collect();
        FuncIds { ids }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&'m str> {
        self.ids.get(index).copied().flatten()
    }
}

/// Append `bytes` as a quoted string literal.
pub(crate) fn push_string(out: &mut String, bytes: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push('"');
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
            out.push(char::from(b));
        } else {
            out.push('\\');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0xf)]));
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests;
