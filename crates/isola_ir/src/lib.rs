//! Isola IR - WebAssembly Expression Trees
//!
//! This crate contains the in-memory representation every other isola crate
//! works on:
//! - Value types and function signatures
//! - Expression IDs and child ranges
//! - The per-module expression arena
//! - Modules, functions and the non-code sections they carry
//! - The cross-module deep copy
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//!   into the arena of the module that owns them.
//! - **One Owner**: an `ExprId` is only meaningful against the arena it came
//!   from. Moving a tree to another module goes through [`copy_expr`], which
//!   re-allocates every node in the destination.
//! - **Exact Types**: signatures are stored and compared by value, never
//!   re-derived from arities.
//!
//! Float constants are stored as raw bits so `Eq`/`Hash` are exact and NaN
//! payloads survive a copy.

mod arena;
mod copy;
mod error;
mod expr_id;
mod instr;
mod module;
mod types;

pub use arena::ExprArena;
pub use copy::{copy_expr, subtree_size};
pub use error::IrError;
pub use expr_id::{ExprId, ExprRange, TargetRange};
pub use instr::{BlockType, ExprKind, ExprTag, Instr, LoadOp, MemArg, NumOp, StoreOp};
pub use module::{
    ConstExpr, DataMode, DataSegment, ElemSegment, Export, ExportKind, Function, Global,
    ImportName, Memory, Module, Table,
};
pub use types::{SigId, Signature, SignaturePool, ValType};

/// Invoke `$mac` with the full table of numeric operators.
///
/// Each row is `Variant => "mnemonic", operand_count;`. Every numeric
/// operator consumes one or two values and produces exactly one. The
/// variant names match the decoder's operator names so that crates mapping
/// from a binary reader can generate their match arms from the same table.
#[macro_export]
macro_rules! for_each_numeric_op {
    ($mac:ident) => {
        $mac! {
            I32Eqz => "i32.eqz", 1;
            I32Eq => "i32.eq", 2;
            I32Ne => "i32.ne", 2;
            I32LtS => "i32.lt_s", 2;
            I32LtU => "i32.lt_u", 2;
            I32GtS => "i32.gt_s", 2;
            I32GtU => "i32.gt_u", 2;
            I32LeS => "i32.le_s", 2;
            I32LeU => "i32.le_u", 2;
            I32GeS => "i32.ge_s", 2;
            I32GeU => "i32.ge_u", 2;
            I64Eqz => "i64.eqz", 1;
            I64Eq => "i64.eq", 2;
            I64Ne => "i64.ne", 2;
            I64LtS => "i64.lt_s", 2;
            I64LtU => "i64.lt_u", 2;
            I64GtS => "i64.gt_s", 2;
            I64GtU => "i64.gt_u", 2;
            I64LeS => "i64.le_s", 2;
            I64LeU => "i64.le_u", 2;
            I64GeS => "i64.ge_s", 2;
            I64GeU => "i64.ge_u", 2;
            F32Eq => "f32.eq", 2;
            F32Ne => "f32.ne", 2;
            F32Lt => "f32.lt", 2;
            F32Gt => "f32.gt", 2;
            F32Le => "f32.le", 2;
            F32Ge => "f32.ge", 2;
            F64Eq => "f64.eq", 2;
            F64Ne => "f64.ne", 2;
            F64Lt => "f64.lt", 2;
            F64Gt => "f64.gt", 2;
            F64Le => "f64.le", 2;
            F64Ge => "f64.ge", 2;
            I32Clz => "i32.clz", 1;
            I32Ctz => "i32.ctz", 1;
            I32Popcnt => "i32.popcnt", 1;
            I32Add => "i32.add", 2;
            I32Sub => "i32.sub", 2;
            I32Mul => "i32.mul", 2;
            I32DivS => "i32.div_s", 2;
            I32DivU => "i32.div_u", 2;
            I32RemS => "i32.rem_s", 2;
            I32RemU => "i32.rem_u", 2;
            I32And => "i32.and", 2;
            I32Or => "i32.or", 2;
            I32Xor => "i32.xor", 2;
            I32Shl => "i32.shl", 2;
            I32ShrS => "i32.shr_s", 2;
            I32ShrU => "i32.shr_u", 2;
            I32Rotl => "i32.rotl", 2;
            I32Rotr => "i32.rotr", 2;
            I64Clz => "i64.clz", 1;
            I64Ctz => "i64.ctz", 1;
            I64Popcnt => "i64.popcnt", 1;
            I64Add => "i64.add", 2;
            I64Sub => "i64.sub", 2;
            I64Mul => "i64.mul", 2;
            I64DivS => "i64.div_s", 2;
            I64DivU => "i64.div_u", 2;
            I64RemS => "i64.rem_s", 2;
            I64RemU => "i64.rem_u", 2;
            I64And => "i64.and", 2;
            I64Or => "i64.or", 2;
            I64Xor => "i64.xor", 2;
            I64Shl => "i64.shl", 2;
            I64ShrS => "i64.shr_s", 2;
            I64ShrU => "i64.shr_u", 2;
            I64Rotl => "i64.rotl", 2;
            I64Rotr => "i64.rotr", 2;
            F32Abs => "f32.abs", 1;
            F32Neg => "f32.neg", 1;
            F32Ceil => "f32.ceil", 1;
            F32Floor => "f32.floor", 1;
            F32Trunc => "f32.trunc", 1;
            F32Nearest => "f32.nearest", 1;
            F32Sqrt => "f32.sqrt", 1;
            F32Add => "f32.add", 2;
            F32Sub => "f32.sub", 2;
            F32Mul => "f32.mul", 2;
            F32Div => "f32.div", 2;
            F32Min => "f32.min", 2;
            F32Max => "f32.max", 2;
            F32Copysign => "f32.copysign", 2;
            F64Abs => "f64.abs", 1;
            F64Neg => "f64.neg", 1;
            F64Ceil => "f64.ceil", 1;
            F64Floor => "f64.floor", 1;
            F64Trunc => "f64.trunc", 1;
            F64Nearest => "f64.nearest", 1;
            F64Sqrt => "f64.sqrt", 1;
            F64Add => "f64.add", 2;
            F64Sub => "f64.sub", 2;
            F64Mul => "f64.mul", 2;
            F64Div => "f64.div", 2;
            F64Min => "f64.min", 2;
            F64Max => "f64.max", 2;
            F64Copysign => "f64.copysign", 2;
            I32WrapI64 => "i32.wrap_i64", 1;
            I32TruncF32S => "i32.trunc_f32_s", 1;
            I32TruncF32U => "i32.trunc_f32_u", 1;
            I32TruncF64S => "i32.trunc_f64_s", 1;
            I32TruncF64U => "i32.trunc_f64_u", 1;
            I64ExtendI32S => "i64.extend_i32_s", 1;
            I64ExtendI32U => "i64.extend_i32_u", 1;
            I64TruncF32S => "i64.trunc_f32_s", 1;
            I64TruncF32U => "i64.trunc_f32_u", 1;
            I64TruncF64S => "i64.trunc_f64_s", 1;
            I64TruncF64U => "i64.trunc_f64_u", 1;
            F32ConvertI32S => "f32.convert_i32_s", 1;
            F32ConvertI32U => "f32.convert_i32_u", 1;
            F32ConvertI64S => "f32.convert_i64_s", 1;
            F32ConvertI64U => "f32.convert_i64_u", 1;
            F32DemoteF64 => "f32.demote_f64", 1;
            F64ConvertI32S => "f64.convert_i32_s", 1;
            F64ConvertI32U => "f64.convert_i32_u", 1;
            F64ConvertI64S => "f64.convert_i64_s", 1;
            F64ConvertI64U => "f64.convert_i64_u", 1;
            F64PromoteF32 => "f64.promote_f32", 1;
            I32ReinterpretF32 => "i32.reinterpret_f32", 1;
            I64ReinterpretF64 => "i64.reinterpret_f64", 1;
            F32ReinterpretI32 => "f32.reinterpret_i32", 1;
            F64ReinterpretI64 => "f64.reinterpret_i64", 1;
            I32Extend8S => "i32.extend8_s", 1;
            I32Extend16S => "i32.extend16_s", 1;
            I64Extend8S => "i64.extend8_s", 1;
            I64Extend16S => "i64.extend16_s", 1;
            I64Extend32S => "i64.extend32_s", 1;
            I32TruncSatF32S => "i32.trunc_sat_f32_s", 1;
            I32TruncSatF32U => "i32.trunc_sat_f32_u", 1;
            I32TruncSatF64S => "i32.trunc_sat_f64_s", 1;
            I32TruncSatF64U => "i32.trunc_sat_f64_u", 1;
            I64TruncSatF32S => "i64.trunc_sat_f32_s", 1;
            I64TruncSatF32U => "i64.trunc_sat_f32_u", 1;
            I64TruncSatF64S => "i64.trunc_sat_f64_s", 1;
            I64TruncSatF64U => "i64.trunc_sat_f64_u", 1;
        }
    };
}
