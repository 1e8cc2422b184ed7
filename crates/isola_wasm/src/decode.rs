//! Binary decoding.
//!
//! Sections are read in order with `wasmparser`. Imported functions,
//! tables, memories and globals are added as they are met, so they precede
//! the defined items of their kind. Function names come from the `name`
//! custom section, which follows the code.

use isola_ir::{
    ConstExpr, DataMode, DataSegment, ElemSegment, Export, ExportKind, Function, Global,
    ImportName, Memory, Module, Signature, Table, ValType,
};
use wasmparser::{
    Encoding, ExternalKind, FunctionBody, KnownCustom, Name, Operator, Parser, Payload, TypeRef,
};

use crate::builder::{ref_type, val_type, BodyBuilder, Context};
use crate::error::DecodeError;

/// Most locals a function may declare, matching the binary reader's own limit.
const MAX_LOCALS: u64 = 50_000;

const WASM_MAGIC: &[u8; 4] = b"\0asm";

/// `true` if `bytes` start with the binary module magic.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.starts_with(WASM_MAGIC)
}

/// Decode a binary module.
#[tracing::instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Module, DecodeError> {
    let mut decoder = Decoder::default();
    for payload in Parser::new(0).parse_all(bytes) {
        decoder.payload(payload?)?;
    }
    let module = decoder.finish(bytes.len())?;
    tracing::debug!(
        functions = module.function_count(),
        nodes = module.arena().len(),
        "decoded module"
    );
    Ok(module)
}

/// Assemble WebAssembly text and decode the result.
pub fn decode_text(text: &str) -> Result<Module, DecodeError> {
    let bytes = wat::parse_str(text)?;
    decode(&bytes)
}

#[derive(Default)]
struct Decoder {
    module: Module,
    types: Vec<Signature>,
    /// Signature of every function, imported and defined, by index.
    functions: Vec<Signature>,
    /// Index of the function the next code entry belongs to.
    next_body: usize,
    /// Declared data segment count and the offset of its section.
    data_count: Option<(u32, usize)>,
}

impl Decoder {
    /// Check section counts that only agree once every payload is seen.
    fn finish(self, end: usize) -> Result<Module, DecodeError> {
        if self.module.function_count() != self.functions.len() {
            return Err(DecodeError::malformed(
                "function and code section counts differ",
                end,
            ));
        }
        if let Some((count, offset)) = self.data_count {
            if count as usize != self.module.data().len() {
                return Err(DecodeError::malformed(
                    "data count and data section length differ",
                    offset,
                ));
            }
        }
        Ok(self.module)
    }

    fn payload(&mut self, payload: Payload<'_>) -> Result<(), DecodeError> {
        match payload {
            Payload::Version {
                encoding: Encoding::Component,
                range,
                ..
            } => return Err(DecodeError::unsupported("component", range.start)),
            Payload::TypeSection(reader) => {
                let offset = reader.range().start;
                for ty in reader.into_iter_err_on_gc_types() {
                    let ty = ty?;
                    let params = val_types(ty.params(), offset)?;
                    let results = val_types(ty.results(), offset)?;
                    self.types.push(Signature::new(&params, &results));
                }
            }
            Payload::ImportSection(reader) => {
                for import in reader.into_iter_with_offsets() {
                    let (offset, import) = import?;
                    self.import(import, offset)?;
                }
            }
            Payload::FunctionSection(reader) => {
                let offset = reader.range().start;
                for type_index in reader {
                    let sig = self.func_type(type_index?, offset)?;
                    self.functions.push(sig);
                }
                self.next_body = self.module.function_count();
            }
            Payload::TableSection(reader) => {
                for table in reader.into_iter_with_offsets() {
                    let (offset, table) = table?;
                    if !matches!(table.init, wasmparser::TableInit::RefNull) {
                        return Err(DecodeError::unsupported("table initializer", offset));
                    }
                    self.module.add_table(Table {
                        element: ref_type(table.ty.element_type, offset)?,
                        min: u64::from(table.ty.initial),
                        max: table.ty.maximum.map(u64::from),
                        import: None,
                    });
                }
            }
            Payload::MemorySection(reader) => {
                for memory in reader.into_iter_with_offsets() {
                    let (offset, memory) = memory?;
                    self.module.add_memory(memory_type(memory, None, offset)?);
                }
            }
            Payload::GlobalSection(reader) => {
                for global in reader.into_iter_with_offsets() {
                    let (offset, global) = global?;
                    self.module.add_global(Global {
                        ty: val_type(global.ty.content_type, offset)?,
                        mutable: global.ty.mutable,
                        init: Some(const_expr(&global.init_expr)?),
                        import: None,
                    });
                }
            }
            Payload::ExportSection(reader) => {
                for export in reader.into_iter_with_offsets() {
                    let (offset, export) = export?;
                    let kind = match export.kind {
                        ExternalKind::Func => ExportKind::Func,
                        ExternalKind::Table => ExportKind::Table,
                        ExternalKind::Memory => ExportKind::Memory,
                        ExternalKind::Global => ExportKind::Global,
                        ExternalKind::Tag => {
                            return Err(DecodeError::unsupported("tag export", offset))
                        }
                    };
                    self.module.add_export(Export {
                        name: export.name.into(),
                        kind,
                        index: export.index,
                    });
                }
            }
            Payload::StartSection { func, .. } => self.module.set_start(func),
            Payload::DataCountSection { count, range } => {
                self.data_count = Some((count, range.start));
            }
            Payload::ElementSection(reader) => {
                for element in reader.into_iter_with_offsets() {
                    let (offset, element) = element?;
                    self.element(element, offset)?;
                }
            }
            Payload::DataSection(reader) => {
                for data in reader {
                    let data = data?;
                    let mode = match data.kind {
                        wasmparser::DataKind::Passive => DataMode::Passive,
                        wasmparser::DataKind::Active {
                            memory_index,
                            offset_expr,
                        } => DataMode::Active {
                            memory: memory_index,
                            offset: const_expr(&offset_expr)?,
                        },
                    };
                    self.module.add_data(DataSegment {
                        mode,
                        bytes: data.data.into(),
                    });
                }
            }
            Payload::CodeSectionEntry(body) => self.body(&body)?,
            Payload::CustomSection(reader) => {
                if let KnownCustom::Name(names) = reader.as_known() {
                    self.names(names);
                }
            }
            Payload::TagSection(reader) => {
                return Err(DecodeError::unsupported(
                    "exception handling",
                    reader.range().start,
                ))
            }
            _ => {}
        }
        Ok(())
    }

    fn func_type(&self, index: u32, offset: usize) -> Result<Signature, DecodeError> {
        self.types
            .get(index as usize)
            .cloned()
            .ok_or(DecodeError::malformed("unknown type index", offset))
    }

    fn import(&mut self, import: wasmparser::Import<'_>, offset: usize) -> Result<(), DecodeError> {
        let name = ImportName::new(import.module, import.name);
        match import.ty {
            TypeRef::Func(type_index) => {
                let sig = self.func_type(type_index, offset)?;
                self.functions.push(sig.clone());
                self.module
                    .add_function(Function::imported("", sig, name))?;
            }
            TypeRef::Table(table) => self.module.add_table(Table {
                element: ref_type(table.element_type, offset)?,
                min: u64::from(table.initial),
                max: table.maximum.map(u64::from),
                import: Some(name),
            }),
            TypeRef::Memory(memory) => {
                self.module
                    .add_memory(memory_type(memory, Some(name), offset)?);
            }
            TypeRef::Global(global) => self.module.add_global(Global {
                ty: val_type(global.content_type, offset)?,
                mutable: global.mutable,
                init: None,
                import: Some(name),
            }),
            TypeRef::Tag(_) => return Err(DecodeError::unsupported("tag import", offset)),
        }
        Ok(())
    }

    fn element(
        &mut self,
        element: wasmparser::Element<'_>,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let wasmparser::ElementKind::Active {
            table_index,
            offset_expr,
        } = element.kind
        else {
            return Err(DecodeError::unsupported("passive or declared element segment", offset));
        };
        let wasmparser::ElementItems::Functions(items) = element.items else {
            return Err(DecodeError::unsupported("element expressions", offset));
        };
        let functions = items.into_iter().collect::<Result<Vec<u32>, _>>()?;
        self.module.add_element(ElemSegment {
            table: table_index.unwrap_or(0),
            offset: const_expr(&offset_expr)?,
            functions: functions.into(),
        });
        Ok(())
    }

    fn body(&mut self, body: &FunctionBody<'_>) -> Result<(), DecodeError> {
        let offset = body.range().start;
        let index = self.next_body;
        let sig = self
            .functions
            .get(index)
            .cloned()
            .ok_or(DecodeError::malformed("code entry without a function", offset))?;
        self.next_body += 1;

        let mut locals = Vec::new();
        let mut declared = 0u64;
        let mut reader = body.get_locals_reader()?;
        for _ in 0..reader.get_count() {
            let local_offset = reader.original_position();
            let (count, ty) = reader.read()?;
            declared += u64::from(count);
            if declared > MAX_LOCALS {
                return Err(DecodeError::malformed("too many locals", local_offset));
            }
            let ty = val_type(ty, local_offset)?;
            locals.extend(std::iter::repeat(ty).take(count as usize));
        }

        let cx = Context {
            types: &self.types,
            functions: &self.functions,
        };
        let mut builder = BodyBuilder::new(&cx, &mut self.module, &sig);
        let mut reader = body.get_operators_reader()?;
        while !reader.eof() {
            let (op, op_offset) = reader.read_with_offset()?;
            builder.operator(&op, op_offset)?;
        }
        let root = builder.finish(reader.original_position())?;

        self.module
            .add_function(Function::new("", sig, &locals, root))?;
        Ok(())
    }

    /// Apply function names. A malformed name section is ignored.
    fn names(&mut self, names: wasmparser::NameSectionReader<'_>) {
        for subsection in names {
            let map = match subsection {
                Ok(Name::Function(map)) => map,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(%err, "ignoring malformed name section");
                    return;
                }
            };
            for naming in map {
                match naming {
                    Ok(naming) => {
                        if let Some(function) = self.module.function_mut(naming.index as usize) {
                            function.set_name(naming.name);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, "ignoring malformed function name");
                        return;
                    }
                }
            }
        }
    }
}

fn val_types(types: &[wasmparser::ValType], offset: usize) -> Result<Vec<ValType>, DecodeError> {
    types.iter().map(|&ty| val_type(ty, offset)).collect()
}

fn memory_type(
    memory: wasmparser::MemoryType,
    import: Option<ImportName>,
    offset: usize,
) -> Result<Memory, DecodeError> {
    if memory.memory64 {
        return Err(DecodeError::unsupported("64-bit memory", offset));
    }
    if memory.shared {
        return Err(DecodeError::unsupported("shared memory", offset));
    }
    Ok(Memory {
        min: u64::from(memory.initial),
        max: memory.maximum.map(u64::from),
        import,
    })
}

/// A single-instruction constant expression.
fn const_expr(expr: &wasmparser::ConstExpr<'_>) -> Result<ConstExpr, DecodeError> {
    let mut reader = expr.get_operators_reader();
    let (op, offset) = reader.read_with_offset()?;
    let value = match op {
        Operator::I32Const { value } => ConstExpr::I32(value),
        Operator::I64Const { value } => ConstExpr::I64(value),
        Operator::F32Const { value } => ConstExpr::F32(value.bits()),
        Operator::F64Const { value } => ConstExpr::F64(value.bits()),
        Operator::GlobalGet { global_index } => ConstExpr::GlobalGet(global_index),
        Operator::RefFunc { function_index } => ConstExpr::RefFunc(function_index),
        Operator::RefNull { hty } => {
            let ty = wasmparser::RefType::new(true, hty)
                .ok_or_else(|| DecodeError::unsupported("heap type", offset))?;
            ConstExpr::RefNull(ref_type(ty, offset)?)
        }
        _ => return Err(DecodeError::unsupported("constant expression", offset)),
    };
    match reader.read_with_offset()? {
        (Operator::End, _) => Ok(value),
        (_, offset) => Err(DecodeError::unsupported("extended constant expression", offset)),
    }
}
