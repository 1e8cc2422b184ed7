//! Folding a function's instruction stream into expression trees.
//!
//! The builder keeps one frame per open `block`/`loop`/`if` plus one for
//! the function itself. Each frame holds the expressions produced so far
//! together with the number of values each leaves on the stack. An
//! instruction consuming `n` values adopts the most recent pending
//! expressions until `n` values are covered; expressions producing nothing
//! that sit in between are adopted too, so printing children before their
//! parent reproduces the stream exactly.
//!
//! Unreachable code may consume more values than are pending. The
//! instruction then adopts whatever the frame has.

use isola_ir::{
    BlockType, ExprId, ExprKind, ExprRange, Instr, LoadOp, MemArg, Module, NumOp, Signature,
    StoreOp, ValType,
};
use wasmparser::{Operator, RefType};

use crate::error::DecodeError;

macro_rules! numeric_from_operator {
    ($($name:ident => $text:literal, $arity:literal;)*) => {
        fn numeric(op: &Operator<'_>) -> Option<NumOp> {
            match op {
                $(Operator::$name => Some(NumOp::$name),)*
                _ => None,
            }
        }
    };
}

isola_ir::for_each_numeric_op!(numeric_from_operator);

/// Signatures the body may refer to.
pub(crate) struct Context<'a> {
    /// Type section, by type index.
    pub types: &'a [Signature],
    /// Every function's signature, by function index.
    pub functions: &'a [Signature],
}

#[derive(Clone, Copy)]
struct Pending {
    id: ExprId,
    values: usize,
}

#[derive(Clone, Copy)]
enum FrameKind {
    Body,
    Block,
    Loop,
    If {
        condition: ExprRange,
        /// Set once `else` has been seen.
        then_body: Option<ExprRange>,
    },
}

struct Frame {
    kind: FrameKind,
    ty: BlockType,
    params: usize,
    results: usize,
    /// Values adopted by the opening instruction beyond what it consumes.
    carried: usize,
    stack: Vec<Pending>,
}

pub(crate) struct BodyBuilder<'a, 'm> {
    cx: &'a Context<'a>,
    module: &'m mut Module,
    frames: Vec<Frame>,
    root: Option<ExprId>,
}

impl<'a, 'm> BodyBuilder<'a, 'm> {
    pub(crate) fn new(cx: &'a Context<'a>, module: &'m mut Module, signature: &Signature) -> Self {
        BodyBuilder {
            cx,
            module,
            frames: vec![Frame {
                kind: FrameKind::Body,
                ty: BlockType::Empty,
                params: 0,
                results: signature.result_arity(),
                carried: 0,
                stack: Vec::new(),
            }],
            root: None,
        }
    }

    /// The body's root, once the final `end` has been seen.
    pub(crate) fn finish(self, offset: usize) -> Result<ExprId, DecodeError> {
        self.root
            .ok_or(DecodeError::malformed("function body is not terminated", offset))
    }

    pub(crate) fn operator(&mut self, op: &Operator<'_>, offset: usize) -> Result<(), DecodeError> {
        if let Some(num) = numeric(op) {
            return self.instr(Instr::Numeric(num), num.arity(), 1, offset);
        }
        match *op {
            Operator::Block { blockty } => self.enter(FrameKind::Block, blockty, offset),
            Operator::Loop { blockty } => self.enter(FrameKind::Loop, blockty, offset),
            Operator::If { blockty } => self.enter(
                FrameKind::If {
                    condition: ExprRange::EMPTY,
                    then_body: None,
                },
                blockty,
                offset,
            ),
            Operator::Else => self.else_arm(offset),
            Operator::End => self.end(offset),

            Operator::Unreachable => self.instr(Instr::Unreachable, 0, 0, offset),
            Operator::Nop => self.instr(Instr::Nop, 0, 0, offset),
            Operator::Br { relative_depth } => {
                let arity = self.label_arity(relative_depth, offset)?;
                self.instr(Instr::Br(relative_depth), arity, 0, offset)
            }
            Operator::BrIf { relative_depth } => {
                let arity = self.label_arity(relative_depth, offset)?;
                self.instr(Instr::BrIf(relative_depth), arity + 1, arity, offset)
            }
            Operator::BrTable { ref targets } => {
                let depths = targets.targets().collect::<Result<Vec<u32>, _>>()?;
                let default = targets.default();
                let arity = self.label_arity(default, offset)?;
                let targets = self.module.arena_mut().alloc_targets(&depths)?;
                self.instr(Instr::BrTable { targets, default }, arity + 1, 0, offset)
            }
            Operator::Return => {
                let arity = self.frames.first().map_or(0, |body| body.results);
                self.instr(Instr::Return, arity, 0, offset)
            }
            Operator::Call { function_index } => {
                let sig = self
                    .cx
                    .functions
                    .get(function_index as usize)
                    .ok_or(DecodeError::malformed("call to unknown function", offset))?;
                let (params, results) = (sig.param_arity(), sig.result_arity());
                self.instr(Instr::Call(function_index), params, results, offset)
            }
            Operator::CallIndirect {
                type_index,
                table_index,
            } => {
                let sig = self.func_type(type_index, offset)?.clone();
                let (params, results) = (sig.param_arity(), sig.result_arity());
                let sig = self.module.intern_signature(sig)?;
                let op = Instr::CallIndirect {
                    sig,
                    table: table_index,
                };
                self.instr(op, params + 1, results, offset)
            }

            Operator::Drop => self.instr(Instr::Drop, 1, 0, offset),
            Operator::Select => self.instr(Instr::Select, 3, 1, offset),
            Operator::TypedSelect { ty } => {
                let ty = val_type(ty, offset)?;
                self.instr(Instr::TypedSelect(ty), 3, 1, offset)
            }

            Operator::LocalGet { local_index } => {
                self.instr(Instr::LocalGet(local_index), 0, 1, offset)
            }
            Operator::LocalSet { local_index } => {
                self.instr(Instr::LocalSet(local_index), 1, 0, offset)
            }
            Operator::LocalTee { local_index } => {
                self.instr(Instr::LocalTee(local_index), 1, 1, offset)
            }
            Operator::GlobalGet { global_index } => {
                self.instr(Instr::GlobalGet(global_index), 0, 1, offset)
            }
            Operator::GlobalSet { global_index } => {
                self.instr(Instr::GlobalSet(global_index), 1, 0, offset)
            }

            Operator::I32Load { memarg } => self.load(LoadOp::I32Load, memarg, offset),
            Operator::I64Load { memarg } => self.load(LoadOp::I64Load, memarg, offset),
            Operator::F32Load { memarg } => self.load(LoadOp::F32Load, memarg, offset),
            Operator::F64Load { memarg } => self.load(LoadOp::F64Load, memarg, offset),
            Operator::I32Load8S { memarg } => self.load(LoadOp::I32Load8S, memarg, offset),
            Operator::I32Load8U { memarg } => self.load(LoadOp::I32Load8U, memarg, offset),
            Operator::I32Load16S { memarg } => self.load(LoadOp::I32Load16S, memarg, offset),
            Operator::I32Load16U { memarg } => self.load(LoadOp::I32Load16U, memarg, offset),
            Operator::I64Load8S { memarg } => self.load(LoadOp::I64Load8S, memarg, offset),
            Operator::I64Load8U { memarg } => self.load(LoadOp::I64Load8U, memarg, offset),
            Operator::I64Load16S { memarg } => self.load(LoadOp::I64Load16S, memarg, offset),
            Operator::I64Load16U { memarg } => self.load(LoadOp::I64Load16U, memarg, offset),
            Operator::I64Load32S { memarg } => self.load(LoadOp::I64Load32S, memarg, offset),
            Operator::I64Load32U { memarg } => self.load(LoadOp::I64Load32U, memarg, offset),
            Operator::I32Store { memarg } => self.store(StoreOp::I32Store, memarg, offset),
            Operator::I64Store { memarg } => self.store(StoreOp::I64Store, memarg, offset),
            Operator::F32Store { memarg } => self.store(StoreOp::F32Store, memarg, offset),
            Operator::F64Store { memarg } => self.store(StoreOp::F64Store, memarg, offset),
            Operator::I32Store8 { memarg } => self.store(StoreOp::I32Store8, memarg, offset),
            Operator::I32Store16 { memarg } => self.store(StoreOp::I32Store16, memarg, offset),
            Operator::I64Store8 { memarg } => self.store(StoreOp::I64Store8, memarg, offset),
            Operator::I64Store16 { memarg } => self.store(StoreOp::I64Store16, memarg, offset),
            Operator::I64Store32 { memarg } => self.store(StoreOp::I64Store32, memarg, offset),
            Operator::MemorySize { mem } => self.instr(Instr::MemorySize(mem), 0, 1, offset),
            Operator::MemoryGrow { mem } => self.instr(Instr::MemoryGrow(mem), 1, 1, offset),
            Operator::MemoryCopy { dst_mem, src_mem } => self.instr(
                Instr::MemoryCopy {
                    dst: dst_mem,
                    src: src_mem,
                },
                3,
                0,
                offset,
            ),
            Operator::MemoryFill { mem } => self.instr(Instr::MemoryFill(mem), 3, 0, offset),

            Operator::I32Const { value } => self.instr(Instr::I32Const(value), 0, 1, offset),
            Operator::I64Const { value } => self.instr(Instr::I64Const(value), 0, 1, offset),
            Operator::F32Const { value } => {
                self.instr(Instr::F32Const(value.bits()), 0, 1, offset)
            }
            Operator::F64Const { value } => {
                self.instr(Instr::F64Const(value.bits()), 0, 1, offset)
            }

            Operator::RefNull { hty } => {
                let ty = RefType::new(true, hty)
                    .ok_or_else(|| DecodeError::unsupported("heap type", offset))?;
                let ty = ref_type(ty, offset)?;
                self.instr(Instr::RefNull(ty), 0, 1, offset)
            }
            Operator::RefIsNull => self.instr(Instr::RefIsNull, 1, 1, offset),
            Operator::RefFunc { function_index } => {
                self.instr(Instr::RefFunc(function_index), 0, 1, offset)
            }

            ref other => Err(DecodeError::unsupported(
                format!("instruction `{other:?}`"),
                offset,
            )),
        }
    }

    fn top(&mut self, offset: usize) -> Result<&mut Frame, DecodeError> {
        self.frames
            .last_mut()
            .ok_or(DecodeError::malformed("instruction after the end of the body", offset))
    }

    /// Pop the pending expressions supplying `needed` values.
    ///
    /// Returns them in stream order with the number of values the oldest
    /// one leaves over.
    fn take(&mut self, mut needed: usize, offset: usize) -> Result<(Vec<ExprId>, usize), DecodeError> {
        let stack = &mut self.top(offset)?.stack;
        let mut taken = Vec::new();
        let mut surplus = 0;
        while needed > 0 {
            let Some(pending) = stack.pop() else { break };
            taken.push(pending.id);
            if pending.values > needed {
                surplus = pending.values - needed;
                needed = 0;
            } else {
                needed -= pending.values;
            }
        }
        taken.reverse();
        Ok((taken, surplus))
    }

    /// Mark `count` pending values as consumed without adopting their
    /// expressions. Block parameters stay siblings of the block in text.
    fn consume(&mut self, mut count: usize, offset: usize) -> Result<(), DecodeError> {
        for pending in self.top(offset)?.stack.iter_mut().rev() {
            if count == 0 {
                break;
            }
            let used = pending.values.min(count);
            pending.values -= used;
            count -= used;
        }
        Ok(())
    }

    fn push(&mut self, id: ExprId, values: usize, offset: usize) -> Result<(), DecodeError> {
        self.top(offset)?.stack.push(Pending { id, values });
        Ok(())
    }

    fn instr(
        &mut self,
        op: Instr,
        inputs: usize,
        outputs: usize,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let (operands, surplus) = self.take(inputs, offset)?;
        let arena = self.module.arena_mut();
        let operands = arena.alloc_list(&operands)?;
        let id = arena.alloc(ExprKind::Instr { op, operands })?;
        self.push(id, outputs + surplus, offset)
    }

    fn load(
        &mut self,
        op: LoadOp,
        memarg: wasmparser::MemArg,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let memarg = mem_arg(memarg);
        self.instr(Instr::Load { op, memarg }, 1, 1, offset)
    }

    fn store(
        &mut self,
        op: StoreOp,
        memarg: wasmparser::MemArg,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let memarg = mem_arg(memarg);
        self.instr(Instr::Store { op, memarg }, 2, 0, offset)
    }

    fn func_type(&self, index: u32, offset: usize) -> Result<&'a Signature, DecodeError> {
        self.cx
            .types
            .get(index as usize)
            .ok_or(DecodeError::malformed("unknown type index", offset))
    }

    /// Values a branch to `depth` carries: a loop's parameters, otherwise
    /// the label's results.
    fn label_arity(&self, depth: u32, offset: usize) -> Result<usize, DecodeError> {
        let frame = self
            .frames
            .len()
            .checked_sub(depth as usize + 1)
            .and_then(|index| self.frames.get(index))
            .ok_or(DecodeError::malformed("branch depth exceeds nesting", offset))?;
        Ok(match frame.kind {
            FrameKind::Loop => frame.params,
            _ => frame.results,
        })
    }

    /// Block type plus its parameter and result counts.
    fn block_type(
        &mut self,
        ty: wasmparser::BlockType,
        offset: usize,
    ) -> Result<(BlockType, usize, usize), DecodeError> {
        Ok(match ty {
            wasmparser::BlockType::Empty => (BlockType::Empty, 0, 0),
            wasmparser::BlockType::Type(ty) => (BlockType::Value(val_type(ty, offset)?), 0, 1),
            wasmparser::BlockType::FuncType(index) => {
                let sig = self.func_type(index, offset)?.clone();
                let (params, results) = (sig.param_arity(), sig.result_arity());
                (BlockType::Func(self.module.intern_signature(sig)?), params, results)
            }
        })
    }

    fn enter(
        &mut self,
        kind: FrameKind,
        ty: wasmparser::BlockType,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let (ty, params, results) = self.block_type(ty, offset)?;
        let (kind, carried) = match kind {
            FrameKind::If { .. } => {
                let (condition, surplus) = self.take(params + 1, offset)?;
                let condition = self.module.arena_mut().alloc_list(&condition)?;
                let kind = FrameKind::If {
                    condition,
                    then_body: None,
                };
                (kind, surplus)
            }
            kind => {
                self.consume(params, offset)?;
                (kind, 0)
            }
        };
        self.frames.push(Frame {
            kind,
            ty,
            params,
            results,
            carried,
            stack: Vec::new(),
        });
        Ok(())
    }

    fn else_arm(&mut self, offset: usize) -> Result<(), DecodeError> {
        let frame = self.top(offset)?;
        let FrameKind::If {
            condition,
            then_body: None,
        } = frame.kind
        else {
            return Err(DecodeError::malformed("`else` outside of `if`", offset));
        };
        let ids: Vec<ExprId> = frame.stack.drain(..).map(|p| p.id).collect();
        let then_body = Some(self.module.arena_mut().alloc_list(&ids)?);
        self.top(offset)?.kind = FrameKind::If {
            condition,
            then_body,
        };
        Ok(())
    }

    fn end(&mut self, offset: usize) -> Result<(), DecodeError> {
        let frame = self
            .frames
            .pop()
            .ok_or(DecodeError::malformed("unbalanced `end`", offset))?;
        let ids: Vec<ExprId> = frame.stack.iter().map(|p| p.id).collect();
        let arena = self.module.arena_mut();
        let body = arena.alloc_list(&ids)?;
        let ty = frame.ty;
        let kind = match frame.kind {
            FrameKind::Body => ExprKind::Block {
                ty,
                body,
                implicit: true,
            },
            FrameKind::Block => ExprKind::Block {
                ty,
                body,
                implicit: false,
            },
            FrameKind::Loop => ExprKind::Loop { ty, body },
            FrameKind::If {
                condition,
                then_body: None,
            } => ExprKind::If {
                ty,
                condition,
                then_body: body,
                else_body: None,
            },
            FrameKind::If {
                condition,
                then_body: Some(then_body),
            } => ExprKind::If {
                ty,
                condition,
                then_body,
                else_body: Some(body),
            },
        };
        let id = arena.alloc(kind)?;
        if self.frames.is_empty() {
            self.root = Some(id);
            Ok(())
        } else {
            self.push(id, frame.results + frame.carried, offset)
        }
    }
}

fn mem_arg(memarg: wasmparser::MemArg) -> MemArg {
    MemArg {
        offset: memarg.offset,
        align: memarg.align,
        memory: memarg.memory,
    }
}

pub(crate) fn val_type(ty: wasmparser::ValType, offset: usize) -> Result<ValType, DecodeError> {
    Ok(match ty {
        wasmparser::ValType::I32 => ValType::I32,
        wasmparser::ValType::I64 => ValType::I64,
        wasmparser::ValType::F32 => ValType::F32,
        wasmparser::ValType::F64 => ValType::F64,
        wasmparser::ValType::V128 => ValType::V128,
        wasmparser::ValType::Ref(ty) => ref_type(ty, offset)?,
    })
}

pub(crate) fn ref_type(ty: RefType, offset: usize) -> Result<ValType, DecodeError> {
    if ty == RefType::FUNCREF {
        Ok(ValType::FuncRef)
    } else if ty == RefType::EXTERNREF {
        Ok(ValType::ExternRef)
    } else {
        Err(DecodeError::unsupported(format!("reference type `{ty:?}`"), offset))
    }
}

#[cfg(test)]
mod tests;
