//! Value types and function signatures.
//!
//! A [`Signature`] is the type descriptor of a function: the exact sequence
//! of parameter types and the exact sequence of result types. Two
//! signatures are interchangeable only if they are equal element by element;
//! arity alone says nothing about compatibility.

use std::fmt;

use rustc_hash::FxHashMap;

/// A WebAssembly value type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum ValType {
    I32,
    I64,
    F32,
    F64,
    V128,
    FuncRef,
    ExternRef,
}

impl ValType {
    /// Text-format keyword for this type.
    pub const fn keyword(self) -> &'static str {
        match self {
            ValType::I32 => "i32",
            ValType::I64 => "i64",
            ValType::F32 => "f32",
            ValType::F64 => "f64",
            ValType::V128 => "v128",
            ValType::FuncRef => "funcref",
            ValType::ExternRef => "externref",
        }
    }

    /// Heap type keyword used by `ref.null`.
    pub const fn heap_keyword(self) -> Option<&'static str> {
        match self {
            ValType::FuncRef => Some("func"),
            ValType::ExternRef => Some("extern"),
            _ => None,
        }
    }

    pub const fn is_ref(self) -> bool {
        matches!(self, ValType::FuncRef | ValType::ExternRef)
    }
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Parameter and result types of a function or block.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Signature {
    params: Box<[ValType]>,
    results: Box<[ValType]>,
}

impl Signature {
    /// The `[] -> []` signature.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(params: &[ValType], results: &[ValType]) -> Self {
        Signature {
            params: params.into(),
            results: results.into(),
        }
    }

    #[inline]
    pub fn params(&self) -> &[ValType] {
        &self.params
    }

    #[inline]
    pub fn results(&self) -> &[ValType] {
        &self.results
    }

    #[inline]
    pub fn param_arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn result_arity(&self) -> usize {
        self.results.len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, ty) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("] -> [")?;
        for (i, ty) in self.results.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("]")
    }
}

/// Index into a module's [`SignaturePool`].
///
/// Like `ExprId`, a `SigId` is only meaningful against the pool of the module
/// that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SigId(u32);

impl SigId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        SigId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Deduplicated signature storage for block types and `call_indirect`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignaturePool {
    sigs: Vec<Signature>,
    lookup: FxHashMap<Signature, SigId>,
}

impl SignaturePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `sig`, returning the existing id if an equal signature is
    /// already present.
    ///
    /// Returns `None` only when the pool already holds `u32::MAX` entries.
    pub fn intern(&mut self, sig: Signature) -> Option<SigId> {
        if let Some(&id) = self.lookup.get(&sig) {
            return Some(id);
        }
        let id = SigId::new(u32::try_from(self.sigs.len()).ok()?);
        self.sigs.push(sig.clone());
        self.lookup.insert(sig, id);
        Some(id)
    }

    #[inline]
    pub fn get(&self, id: SigId) -> Option<&Signature> {
        self.sigs.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.sigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sigs.is_empty()
    }
}

#[cfg(test)]
mod tests;
