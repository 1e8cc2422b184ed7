//! Module printer.
//!
//! Walks a module top-down and writes folded text to an [`Emitter`].
//! Imports come first (functions, tables, memories, globals), then the
//! defined items in the same order, then exports, the start function and the
//! element and data segments.

use std::fmt::Write;

use isola_ir::{
    BlockType, ConstExpr, DataMode, ExprId, ExprKind, ExprRange, Function, Global, ImportName,
    Instr, IrError, MemArg, Memory, Module, SigId, Signature, Table, ValType,
};
use isola_stack::ensure_sufficient_stack;

use crate::emitter::{Emitter, StringEmitter};
use crate::error::PrintError;
use crate::float::{f32_text, f64_text};
use crate::names::{push_string, FuncIds};

/// Print `module` to `emitter`.
///
/// On error the emitter holds a partial rendering.
pub fn print_module<E: Emitter>(module: &Module, emitter: &mut E) -> Result<(), PrintError> {
    ModulePrinter::new(module, emitter).print()
}

/// Print `module` into a fresh string.
pub fn print_to_string(module: &Module) -> Result<String, PrintError> {
    let mut emitter = StringEmitter::with_capacity(64 * (module.arena().len() + 1));
    print_module(module, &mut emitter)?;
    Ok(emitter.output())
}

struct ModulePrinter<'m, 'e, E: Emitter> {
    module: &'m Module,
    ids: FuncIds<'m>,
    out: &'e mut E,
}

impl<'m, 'e, E: Emitter> ModulePrinter<'m, 'e, E> {
    fn new(module: &'m Module, out: &'e mut E) -> Self {
        ModulePrinter {
            module,
            ids: FuncIds::new(module),
            out,
        }
    }

    fn print(&mut self) -> Result<(), PrintError> {
        let module = self.module;
        if module.is_empty() {
            self.line(0, "(module)");
            return Ok(());
        }
        self.line(0, "(module");

        for (index, function) in module.functions().iter().enumerate() {
            if let Some(import) = function.import() {
                let decl = format!("func{}", self.func_header(index, function.signature()));
                self.import(import, &decl);
            }
        }
        for table in module.tables() {
            if let Some(import) = &table.import {
                self.import(import, &table_decl(table));
            }
        }
        for memory in module.memories() {
            if let Some(import) = &memory.import {
                self.import(import, &memory_decl(memory));
            }
        }
        for global in module.globals() {
            if let Some(import) = &global.import {
                self.import(import, &format!("global {}", global_type(global)));
            }
        }

        for (index, function) in module.functions().iter().enumerate() {
            if function.import().is_none() {
                self.function(index, function)?;
            }
        }
        for table in module.tables().iter().filter(|t| t.import.is_none()) {
            self.line(1, &format!("({})", table_decl(table)));
        }
        for memory in module.memories().iter().filter(|m| m.import.is_none()) {
            self.line(1, &format!("({})", memory_decl(memory)));
        }
        for (index, global) in module.globals().iter().enumerate() {
            if global.import.is_none() {
                let init = global
                    .init
                    .ok_or(PrintError::MissingInitializer { index })?;
                let init = const_expr(init)?;
                self.line(1, &format!("(global {} ({init}))", global_type(global)));
            }
        }

        for export in module.exports() {
            let mut text = String::from("(export ");
            push_string(&mut text, export.name.as_bytes());
            let _ = write!(text, " ({} {}))", export.kind.keyword(), export.index);
            self.line(1, &text);
        }
        if let Some(start) = module.start() {
            self.line(1, &format!("(start {start})"));
        }
        for segment in module.elements() {
            let mut text = String::from("(elem ");
            if segment.table != 0 {
                let _ = write!(text, "(table {}) ", segment.table);
            }
            let _ = write!(text, "({}) func", const_expr(segment.offset)?);
            for function in &segment.functions {
                let _ = write!(text, " {function}");
            }
            text.push(')');
            self.line(1, &text);
        }
        for segment in module.data() {
            let mut text = String::from("(data ");
            if let DataMode::Active { memory, offset } = segment.mode {
                if memory != 0 {
                    let _ = write!(text, "(memory {memory}) ");
                }
                let _ = write!(text, "({}) ", const_expr(offset)?);
            }
            push_string(&mut text, &segment.bytes);
            text.push(')');
            self.line(1, &text);
        }

        self.line(0, ")");
        Ok(())
    }

    fn import(&mut self, import: &ImportName, decl: &str) {
        let mut text = String::from("(import ");
        push_string(&mut text, import.module.as_bytes());
        text.push(' ');
        push_string(&mut text, import.field.as_bytes());
        let _ = write!(text, " ({decl}))");
        self.line(1, &text);
    }

    /// ` $id (param ..) (result ..)` for function `index`.
    fn func_header(&self, index: usize, signature: &Signature) -> String {
        let mut header = String::new();
        if let Some(id) = self.ids.get(index) {
            header.push_str(" $");
            header.push_str(id);
        }
        header.push_str(&signature_text(signature));
        header
    }

    fn function(&mut self, index: usize, function: &Function) -> Result<(), PrintError> {
        let mut head = format!("func{}", self.func_header(index, function.signature()));
        if !function.locals().is_empty() {
            head.push_str(" (local");
            for local in function.locals() {
                head.push(' ');
                head.push_str(local.keyword());
            }
            head.push(')');
        }

        let Some(body) = function.body() else {
            self.line(1, &format!("({head})"));
            return Ok(());
        };
        let arena = self.module.arena();
        let kind = *arena.get(body).ok_or(IrError::DanglingExpr(body))?;
        // The function body block is the function's own label.
        if let ExprKind::Block {
            body: range,
            implicit: true,
            ..
        } = kind
        {
            if range.is_empty() {
                self.line(1, &format!("({head})"));
                return Ok(());
            }
            self.open(1, &head);
            self.children(body, range, 2)?;
        } else {
            self.open(1, &head);
            self.expr(body, 2)?;
        }
        self.close(1);
        Ok(())
    }

    fn expr(&mut self, id: ExprId, level: usize) -> Result<(), PrintError> {
        ensure_sufficient_stack(|| self.expr_inner(id, level))
    }

    fn expr_inner(&mut self, id: ExprId, level: usize) -> Result<(), PrintError> {
        let kind = *self
            .module
            .arena()
            .get(id)
            .ok_or(IrError::DanglingExpr(id))?;
        match kind {
            ExprKind::Block { ty, body, .. } => {
                self.open(level, &format!("block{}", self.block_type(ty)?));
                self.children(id, body, level + 1)?;
                self.close(level);
            }
            ExprKind::Loop { ty, body } => {
                self.open(level, &format!("loop{}", self.block_type(ty)?));
                self.children(id, body, level + 1)?;
                self.close(level);
            }
            ExprKind::If {
                ty,
                condition,
                then_body,
                else_body,
            } => {
                self.open(level, &format!("if{}", self.block_type(ty)?));
                self.children(id, condition, level + 1)?;
                self.arm(id, "then", then_body, level + 1)?;
                if let Some(else_body) = else_body {
                    self.arm(id, "else", else_body, level + 1)?;
                }
                self.close(level);
            }
            ExprKind::Instr { op, operands } => {
                let head = self.instr(op)?;
                if operands.is_empty() {
                    self.line(level, &format!("({head})"));
                } else {
                    self.open(level, &head);
                    self.children(id, operands, level + 1)?;
                    self.close(level);
                }
            }
        }
        Ok(())
    }

    fn arm(
        &mut self,
        parent: ExprId,
        keyword: &str,
        range: ExprRange,
        level: usize,
    ) -> Result<(), PrintError> {
        if range.is_empty() {
            self.line(level, &format!("({keyword})"));
            return Ok(());
        }
        self.open(level, keyword);
        self.children(parent, range, level + 1)?;
        self.close(level);
        Ok(())
    }

    fn children(
        &mut self,
        parent: ExprId,
        range: ExprRange,
        level: usize,
    ) -> Result<(), PrintError> {
        let module = self.module;
        for &child in module.arena().try_list(range)? {
            if child >= parent {
                return Err(IrError::NotATree { parent, child }.into());
            }
            self.expr(child, level)?;
        }
        Ok(())
    }

    fn signature(&self, sig: SigId) -> Result<&'m Signature, PrintError> {
        let module = self.module;
        Ok(module.signature(sig).ok_or(IrError::DanglingSig(sig))?)
    }

    fn block_type(&self, ty: BlockType) -> Result<String, PrintError> {
        Ok(match ty {
            BlockType::Empty => String::new(),
            BlockType::Value(ty) => format!(" (result {ty})"),
            BlockType::Func(sig) => signature_text(self.signature(sig)?),
        })
    }

    /// Mnemonic plus immediates.
    fn instr(&self, op: Instr) -> Result<String, PrintError> {
        Ok(match op {
            Instr::Unreachable => "unreachable".to_owned(),
            Instr::Nop => "nop".to_owned(),
            Instr::Br(depth) => format!("br {depth}"),
            Instr::BrIf(depth) => format!("br_if {depth}"),
            Instr::BrTable { targets, default } => {
                let mut text = String::from("br_table");
                for depth in self.module.arena().try_targets(targets)? {
                    let _ = write!(text, " {depth}");
                }
                let _ = write!(text, " {default}");
                text
            }
            Instr::Return => "return".to_owned(),
            Instr::Call(function) => format!("call {function}"),
            Instr::CallIndirect { sig, table } => {
                let mut text = String::from("call_indirect");
                if table != 0 {
                    let _ = write!(text, " {table}");
                }
                text.push_str(&signature_text(self.signature(sig)?));
                text
            }
            Instr::Drop => "drop".to_owned(),
            Instr::Select => "select".to_owned(),
            Instr::TypedSelect(ty) => format!("select (result {ty})"),
            Instr::LocalGet(index) => format!("local.get {index}"),
            Instr::LocalSet(index) => format!("local.set {index}"),
            Instr::LocalTee(index) => format!("local.tee {index}"),
            Instr::GlobalGet(index) => format!("global.get {index}"),
            Instr::GlobalSet(index) => format!("global.set {index}"),
            Instr::Load { op, memarg } => {
                memarg_text(op.mnemonic(), op.natural_align(), memarg)?
            }
            Instr::Store { op, memarg } => {
                memarg_text(op.mnemonic(), op.natural_align(), memarg)?
            }
            Instr::MemorySize(0) => "memory.size".to_owned(),
            Instr::MemorySize(memory) => format!("memory.size {memory}"),
            Instr::MemoryGrow(0) => "memory.grow".to_owned(),
            Instr::MemoryGrow(memory) => format!("memory.grow {memory}"),
            Instr::MemoryCopy { dst: 0, src: 0 } => "memory.copy".to_owned(),
            Instr::MemoryCopy { dst, src } => format!("memory.copy {dst} {src}"),
            Instr::MemoryFill(0) => "memory.fill".to_owned(),
            Instr::MemoryFill(memory) => format!("memory.fill {memory}"),
            Instr::I32Const(value) => format!("i32.const {value}"),
            Instr::I64Const(value) => format!("i64.const {value}"),
            Instr::F32Const(bits) => format!("f32.const {}", f32_text(bits)),
            Instr::F64Const(bits) => format!("f64.const {}", f64_text(bits)),
            Instr::RefNull(ty) => format!("ref.null {}", heap_type(ty)?),
            Instr::RefIsNull => "ref.is_null".to_owned(),
            Instr::RefFunc(function) => format!("ref.func {function}"),
            Instr::Numeric(op) => op.mnemonic().to_owned(),
        })
    }

    fn line(&mut self, level: usize, text: &str) {
        self.out.emit_indent(level);
        self.out.emit(text);
        self.out.emit_newline();
    }

    fn open(&mut self, level: usize, head: &str) {
        self.out.emit_indent(level);
        self.out.emit("(");
        self.out.emit(head);
        self.out.emit_newline();
    }

    fn close(&mut self, level: usize) {
        self.line(level, ")");
    }
}

/// ` (param ..) (result ..)`, each part omitted when empty.
fn signature_text(signature: &Signature) -> String {
    let mut text = String::new();
    for (keyword, types) in [("param", signature.params()), ("result", signature.results())] {
        if types.is_empty() {
            continue;
        }
        let _ = write!(text, " ({keyword}");
        for ty in types {
            text.push(' ');
            text.push_str(ty.keyword());
        }
        text.push(')');
    }
    text
}

fn memarg_text(mnemonic: &str, natural_align: u8, memarg: MemArg) -> Result<String, PrintError> {
    let mut text = mnemonic.to_owned();
    if memarg.memory != 0 {
        let _ = write!(text, " {}", memarg.memory);
    }
    if memarg.offset != 0 {
        let _ = write!(text, " offset={}", memarg.offset);
    }
    if memarg.align != natural_align {
        let bytes = 1u64
            .checked_shl(u32::from(memarg.align))
            .ok_or(PrintError::Alignment(memarg.align))?;
        let _ = write!(text, " align={bytes}");
    }
    Ok(text)
}

fn heap_type(ty: ValType) -> Result<&'static str, PrintError> {
    ty.heap_keyword().ok_or(PrintError::NotARefType(ty))
}

fn const_expr(expr: ConstExpr) -> Result<String, PrintError> {
    Ok(match expr {
        ConstExpr::I32(value) => format!("i32.const {value}"),
        ConstExpr::I64(value) => format!("i64.const {value}"),
        ConstExpr::F32(bits) => format!("f32.const {}", f32_text(bits)),
        ConstExpr::F64(bits) => format!("f64.const {}", f64_text(bits)),
        ConstExpr::GlobalGet(index) => format!("global.get {index}"),
        ConstExpr::RefNull(ty) => format!("ref.null {}", heap_type(ty)?),
        ConstExpr::RefFunc(index) => format!("ref.func {index}"),
    })
}

fn limits(min: u64, max: Option<u64>) -> String {
    match max {
        Some(max) => format!("{min} {max}"),
        None => min.to_string(),
    }
}

fn table_decl(table: &Table) -> String {
    format!(
        "table {} {}",
        limits(table.min, table.max),
        table.element.keyword()
    )
}

fn memory_decl(memory: &Memory) -> String {
    format!("memory {}", limits(memory.min, memory.max))
}

fn global_type(global: &Global) -> String {
    if global.mutable {
        format!("(mut {})", global.ty)
    } else {
        global.ty.keyword().to_owned()
    }
}

#[cfg(test)]
mod tests;
