//! Expression node kinds.
//!
//! [`ExprKind`] is the arena payload. Structured control flow (`block`,
//! `loop`, `if`) owns child ranges for its bodies; every other instruction is
//! an [`Instr`] plus the range of folded operand expressions that feed it.
//! Printing children before their parent reproduces the original
//! instruction order exactly, so operand ranges may also contain
//! expressions that produce no value (they were interleaved in the stream).

use crate::expr_id::{ExprRange, TargetRange};
use crate::types::{SigId, ValType};

macro_rules! define_numeric_ops {
    ($($name:ident => $text:literal, $arity:literal;)*) => {
        /// Numeric operator without immediates.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum NumOp {
            $($name,)*
        }

        impl NumOp {
            /// Every numeric operator, in table order.
            pub const ALL: &'static [NumOp] = &[$(NumOp::$name,)*];

            /// Text-format mnemonic.
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(NumOp::$name => $text,)*
                }
            }

            /// Number of values consumed. Always 1 or 2; one value is produced.
            pub const fn arity(self) -> usize {
                match self {
                    $(NumOp::$name => $arity,)*
                }
            }
        }
    };
}

crate::for_each_numeric_op!(define_numeric_ops);

/// Memory load operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LoadOp {
    I32Load,
    I64Load,
    F32Load,
    F64Load,
    I32Load8S,
    I32Load8U,
    I32Load16S,
    I32Load16U,
    I64Load8S,
    I64Load8U,
    I64Load16S,
    I64Load16U,
    I64Load32S,
    I64Load32U,
}

impl LoadOp {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            LoadOp::I32Load => "i32.load",
            LoadOp::I64Load => "i64.load",
            LoadOp::F32Load => "f32.load",
            LoadOp::F64Load => "f64.load",
            LoadOp::I32Load8S => "i32.load8_s",
            LoadOp::I32Load8U => "i32.load8_u",
            LoadOp::I32Load16S => "i32.load16_s",
            LoadOp::I32Load16U => "i32.load16_u",
            LoadOp::I64Load8S => "i64.load8_s",
            LoadOp::I64Load8U => "i64.load8_u",
            LoadOp::I64Load16S => "i64.load16_s",
            LoadOp::I64Load16U => "i64.load16_u",
            LoadOp::I64Load32S => "i64.load32_s",
            LoadOp::I64Load32U => "i64.load32_u",
        }
    }

    /// Natural alignment as a power of two (the access width in bytes).
    pub const fn natural_align(self) -> u8 {
        match self {
            LoadOp::I32Load8S | LoadOp::I32Load8U | LoadOp::I64Load8S | LoadOp::I64Load8U => 0,
            LoadOp::I32Load16S | LoadOp::I32Load16U | LoadOp::I64Load16S | LoadOp::I64Load16U => 1,
            LoadOp::I32Load | LoadOp::F32Load | LoadOp::I64Load32S | LoadOp::I64Load32U => 2,
            LoadOp::I64Load | LoadOp::F64Load => 3,
        }
    }
}

/// Memory store operators.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StoreOp {
    I32Store,
    I64Store,
    F32Store,
    F64Store,
    I32Store8,
    I32Store16,
    I64Store8,
    I64Store16,
    I64Store32,
}

impl StoreOp {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            StoreOp::I32Store => "i32.store",
            StoreOp::I64Store => "i64.store",
            StoreOp::F32Store => "f32.store",
            StoreOp::F64Store => "f64.store",
            StoreOp::I32Store8 => "i32.store8",
            StoreOp::I32Store16 => "i32.store16",
            StoreOp::I64Store8 => "i64.store8",
            StoreOp::I64Store16 => "i64.store16",
            StoreOp::I64Store32 => "i64.store32",
        }
    }

    pub const fn natural_align(self) -> u8 {
        match self {
            StoreOp::I32Store8 | StoreOp::I64Store8 => 0,
            StoreOp::I32Store16 | StoreOp::I64Store16 => 1,
            StoreOp::I32Store | StoreOp::F32Store | StoreOp::I64Store32 => 2,
            StoreOp::I64Store | StoreOp::F64Store => 3,
        }
    }
}

/// Memory immediate: static offset, alignment exponent and memory index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct MemArg {
    pub offset: u64,
    /// Alignment as a power of two.
    pub align: u8,
    pub memory: u32,
}

/// Type of a `block`, `loop` or `if`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum BlockType {
    #[default]
    Empty,
    Value(ValType),
    /// Multi-value block type, interned in the owning module's pool.
    Func(SigId),
}

/// A non-structured instruction with its immediates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instr {
    Unreachable,
    Nop,
    Br(u32),
    BrIf(u32),
    BrTable { targets: TargetRange, default: u32 },
    Return,
    Call(u32),
    CallIndirect { sig: SigId, table: u32 },
    Drop,
    Select,
    TypedSelect(ValType),
    LocalGet(u32),
    LocalSet(u32),
    LocalTee(u32),
    GlobalGet(u32),
    GlobalSet(u32),
    Load { op: LoadOp, memarg: MemArg },
    Store { op: StoreOp, memarg: MemArg },
    MemorySize(u32),
    MemoryGrow(u32),
    MemoryCopy { dst: u32, src: u32 },
    MemoryFill(u32),
    I32Const(i32),
    I64Const(i64),
    /// `f32.const`, stored as raw bits.
    F32Const(u32),
    /// `f64.const`, stored as raw bits.
    F64Const(u64),
    RefNull(ValType),
    RefIsNull,
    RefFunc(u32),
    Numeric(NumOp),
}

/// Expression node kinds.
///
/// All children are ranges into the owning arena, not boxes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// `block`. An `implicit` block is the body of a function and has no
    /// textual `block` keyword of its own.
    Block {
        ty: BlockType,
        body: ExprRange,
        implicit: bool,
    },
    Loop {
        ty: BlockType,
        body: ExprRange,
    },
    /// `if`. `condition` holds the expressions evaluated before the `if`
    /// opcode: the condition itself plus any block parameters.
    If {
        ty: BlockType,
        condition: ExprRange,
        then_body: ExprRange,
        else_body: Option<ExprRange>,
    },
    Instr {
        op: Instr,
        operands: ExprRange,
    },
}

impl ExprKind {
    /// Child ranges in evaluation order: condition, then-body, else-body for
    /// `if`; the body for blocks and loops; the operands for instructions.
    pub fn child_ranges(&self) -> impl Iterator<Item = ExprRange> {
        let ranges = match *self {
            ExprKind::Block { body, .. } | ExprKind::Loop { body, .. } => [Some(body), None, None],
            ExprKind::If {
                condition,
                then_body,
                else_body,
                ..
            } => [Some(condition), Some(then_body), else_body],
            ExprKind::Instr { operands, .. } => [Some(operands), None, None],
        };
        ranges.into_iter().flatten()
    }

    /// Stable numeric tag for this node kind.
    pub fn tag(&self) -> ExprTag {
        match *self {
            ExprKind::Block { .. } => ExprTag::Block,
            ExprKind::Loop { .. } => ExprTag::Loop,
            ExprKind::If { .. } => ExprTag::If,
            ExprKind::Instr { op, .. } => op.tag(),
        }
    }
}

impl Instr {
    pub fn tag(self) -> ExprTag {
        match self {
            Instr::Unreachable => ExprTag::Unreachable,
            Instr::Nop => ExprTag::Nop,
            Instr::Br(_) | Instr::BrIf(_) => ExprTag::Break,
            Instr::BrTable { .. } => ExprTag::Switch,
            Instr::Return => ExprTag::Return,
            Instr::Call(_) => ExprTag::Call,
            Instr::CallIndirect { .. } => ExprTag::CallIndirect,
            Instr::Drop => ExprTag::Drop,
            Instr::Select | Instr::TypedSelect(_) => ExprTag::Select,
            Instr::LocalGet(_) => ExprTag::LocalGet,
            Instr::LocalSet(_) | Instr::LocalTee(_) => ExprTag::LocalSet,
            Instr::GlobalGet(_) => ExprTag::GlobalGet,
            Instr::GlobalSet(_) => ExprTag::GlobalSet,
            Instr::Load { .. } => ExprTag::Load,
            Instr::Store { .. } => ExprTag::Store,
            Instr::MemorySize(_) => ExprTag::MemorySize,
            Instr::MemoryGrow(_) => ExprTag::MemoryGrow,
            Instr::MemoryCopy { .. } => ExprTag::MemoryCopy,
            Instr::MemoryFill(_) => ExprTag::MemoryFill,
            Instr::I32Const(_) | Instr::I64Const(_) | Instr::F32Const(_) | Instr::F64Const(_) => {
                ExprTag::Const
            }
            Instr::RefNull(_) => ExprTag::RefNull,
            Instr::RefIsNull => ExprTag::RefIsNull,
            Instr::RefFunc(_) => ExprTag::RefFunc,
            Instr::Numeric(op) => {
                if op.arity() == 1 {
                    ExprTag::Unary
                } else {
                    ExprTag::Binary
                }
            }
        }
    }
}

/// Coarse expression class with a stable numeric id.
///
/// Several instructions share a tag (`br` and `br_if` are both `Break`,
/// `local.set` and `local.tee` are both `LocalSet`). `0` is never used so
/// hosts can treat it as "no expression".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum ExprTag {
    Block = 1,
    If = 2,
    Loop = 3,
    Break = 4,
    Switch = 5,
    Call = 6,
    CallIndirect = 7,
    LocalGet = 8,
    LocalSet = 9,
    GlobalGet = 10,
    GlobalSet = 11,
    Load = 12,
    Store = 13,
    Const = 14,
    Unary = 15,
    Binary = 16,
    Select = 17,
    Drop = 18,
    Return = 19,
    MemorySize = 20,
    MemoryGrow = 21,
    Nop = 22,
    Unreachable = 23,
    MemoryCopy = 24,
    MemoryFill = 25,
    RefNull = 26,
    RefIsNull = 27,
    RefFunc = 28,
}

impl ExprTag {
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }
}
