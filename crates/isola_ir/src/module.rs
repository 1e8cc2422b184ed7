//! Modules and the functions they own.
//!
//! A [`Module`] owns its functions, its expression arena and its signature
//! pool. Every `ExprId`/`SigId` stored in the module refers to that module's
//! own storage. Index spaces follow the binary format: imported items come
//! first within each kind.

use crate::arena::ExprArena;
use crate::error::IrError;
use crate::expr_id::ExprId;
use crate::types::{SigId, Signature, SignaturePool, ValType};

/// `(import "module" "field")` pair.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ImportName {
    pub module: Box<str>,
    pub field: Box<str>,
}

impl ImportName {
    pub fn new(module: &str, field: &str) -> Self {
        ImportName {
            module: module.into(),
            field: field.into(),
        }
    }
}

/// A function declaration.
///
/// Defined functions have a body; imported functions do not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    name: Box<str>,
    signature: Signature,
    locals: Box<[ValType]>,
    body: Option<ExprId>,
    import: Option<ImportName>,
}

impl Function {
    /// A defined function. `locals` are the declared locals after the
    /// parameters; `body` must be a node of the module the function is added to.
    pub fn new(name: &str, signature: Signature, locals: &[ValType], body: ExprId) -> Self {
        Function {
            name: name.into(),
            signature,
            locals: locals.into(),
            body: Some(body),
            import: None,
        }
    }

    pub fn imported(name: &str, signature: Signature, import: ImportName) -> Self {
        Function {
            name: name.into(),
            signature,
            locals: Box::default(),
            body: None,
            import: Some(import),
        }
    }

    /// Name from the `name` section, or `""` when the function is unnamed.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub fn params(&self) -> &[ValType] {
        self.signature.params()
    }

    #[inline]
    pub fn results(&self) -> &[ValType] {
        self.signature.results()
    }

    #[inline]
    pub fn locals(&self) -> &[ValType] {
        &self.locals
    }

    /// Root expression, `None` for imports.
    #[inline]
    pub fn body(&self) -> Option<ExprId> {
        self.body
    }

    #[inline]
    pub fn import(&self) -> Option<&ImportName> {
        self.import.as_ref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }
}

/// Single-instruction constant expression (global initializers, segment offsets).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstExpr {
    I32(i32),
    I64(i64),
    F32(u32),
    F64(u64),
    GlobalGet(u32),
    RefNull(ValType),
    RefFunc(u32),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Memory {
    pub min: u64,
    pub max: Option<u64>,
    pub import: Option<ImportName>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    pub element: ValType,
    pub min: u64,
    pub max: Option<u64>,
    pub import: Option<ImportName>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Global {
    pub ty: ValType,
    pub mutable: bool,
    /// Initializer; `None` for imported globals.
    pub init: Option<ConstExpr>,
    pub import: Option<ImportName>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExportKind {
    Func,
    Table,
    Memory,
    Global,
}

impl ExportKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            ExportKind::Func => "func",
            ExportKind::Table => "table",
            ExportKind::Memory => "memory",
            ExportKind::Global => "global",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Export {
    pub name: Box<str>,
    pub kind: ExportKind,
    pub index: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataMode {
    Passive,
    Active { memory: u32, offset: ConstExpr },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DataSegment {
    pub mode: DataMode,
    pub bytes: Box<[u8]>,
}

/// Active element segment listing function indices.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElemSegment {
    pub table: u32,
    pub offset: ConstExpr,
    pub functions: Box<[u32]>,
}

/// A WebAssembly module.
///
/// `Module::new()` is the empty module: no functions, no sections. It doubles
/// as the "nothing here" result of operations that cannot produce a module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Module {
    functions: Vec<Function>,
    signatures: SignaturePool,
    arena: ExprArena,
    memories: Vec<Memory>,
    tables: Vec<Table>,
    globals: Vec<Global>,
    exports: Vec<Export>,
    start: Option<u32>,
    data: Vec<DataSegment>,
    elements: Vec<ElemSegment>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty module whose arena can hold `nodes` expressions without
    /// reallocating.
    pub fn try_with_capacity(nodes: usize) -> Result<Self, IrError> {
        let mut module = Self::new();
        module.arena.try_reserve(nodes, nodes, 0)?;
        Ok(module)
    }

    /// `true` if the module declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.memories.is_empty()
            && self.tables.is_empty()
            && self.globals.is_empty()
            && self.exports.is_empty()
            && self.start.is_none()
            && self.data.is_empty()
            && self.elements.is_empty()
    }

    #[inline]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    #[inline]
    pub fn function(&self, index: usize) -> Option<&Function> {
        self.functions.get(index)
    }

    pub fn function_mut(&mut self, index: usize) -> Option<&mut Function> {
        self.functions.get_mut(index)
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Append a function, returning its index in the function index space.
    pub fn add_function(&mut self, function: Function) -> Result<u32, IrError> {
        let index = u32::try_from(self.functions.len())
            .map_err(|_| IrError::IndexOverflow { what: "functions" })?;
        self.functions.push(function);
        Ok(index)
    }

    #[inline]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    #[inline]
    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    pub fn signatures(&self) -> &SignaturePool {
        &self.signatures
    }

    pub fn intern_signature(&mut self, sig: Signature) -> Result<SigId, IrError> {
        self.signatures
            .intern(sig)
            .ok_or(IrError::IndexOverflow { what: "signatures" })
    }

    pub fn signature(&self, id: SigId) -> Option<&Signature> {
        self.signatures.get(id)
    }

    pub fn memories(&self) -> &[Memory] {
        &self.memories
    }

    pub fn add_memory(&mut self, memory: Memory) {
        self.memories.push(memory);
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn globals(&self) -> &[Global] {
        &self.globals
    }

    pub fn add_global(&mut self, global: Global) {
        self.globals.push(global);
    }

    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    pub fn add_export(&mut self, export: Export) {
        self.exports.push(export);
    }

    pub fn start(&self) -> Option<u32> {
        self.start
    }

    pub fn set_start(&mut self, function: u32) {
        self.start = Some(function);
    }

    pub fn data(&self) -> &[DataSegment] {
        &self.data
    }

    pub fn add_data(&mut self, segment: DataSegment) {
        self.data.push(segment);
    }

    pub fn elements(&self) -> &[ElemSegment] {
        &self.elements
    }

    pub fn add_element(&mut self, segment: ElemSegment) {
        self.elements.push(segment);
    }
}
