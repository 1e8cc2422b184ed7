//! Cross-module deep copy.
//!
//! [`copy_expr`] re-homes a whole expression tree into another module. Every
//! node, child list, `br_table` label list and interned signature is
//! allocated afresh in the destination, so the result holds no index into the
//! source module and the source can be dropped right after the call.

use isola_stack::ensure_sufficient_stack;

use crate::error::IrError;
use crate::expr_id::{ExprId, ExprRange};
use crate::instr::{BlockType, ExprKind, Instr};
use crate::module::Module;

/// Number of nodes in the tree rooted at `root`, including `root`.
///
/// Fails on dangling ids and on child links that do not point strictly
/// backwards, which is what rules out cycles.
pub fn subtree_size(module: &Module, root: ExprId) -> Result<usize, IrError> {
    ensure_sufficient_stack(|| {
        let kind = module
            .arena()
            .get(root)
            .ok_or(IrError::DanglingExpr(root))?;
        let mut total = 1usize;
        for range in kind.child_ranges() {
            for &child in module.arena().try_list(range)? {
                if child >= root {
                    return Err(IrError::NotATree {
                        parent: root,
                        child,
                    });
                }
                total += subtree_size(module, child)?;
            }
        }
        Ok(total)
    })
}

/// Deep-copy the tree rooted at `root` in `src` into `dst`.
///
/// Returns the root of the copy, owned by `dst`. Storage for the copy is
/// reserved up front, so allocation failure is reported before any node is
/// written.
pub fn copy_expr(src: &Module, root: ExprId, dst: &mut Module) -> Result<ExprId, IrError> {
    let nodes = subtree_size(src, root)?;
    dst.arena_mut()
        .try_reserve(nodes, nodes, src.arena().target_count())?;
    Copier { src, dst }.copy(root)
}

struct Copier<'a> {
    src: &'a Module,
    dst: &'a mut Module,
}

impl Copier<'_> {
    fn copy(&mut self, id: ExprId) -> Result<ExprId, IrError> {
        ensure_sufficient_stack(|| self.copy_node(id))
    }

    fn copy_node(&mut self, id: ExprId) -> Result<ExprId, IrError> {
        let src = self.src;
        let kind = *src.arena().get(id).ok_or(IrError::DanglingExpr(id))?;
        let copied = match kind {
            ExprKind::Block { ty, body, implicit } => ExprKind::Block {
                ty: self.block_type(ty)?,
                body: self.copy_list(id, body)?,
                implicit,
            },
            ExprKind::Loop { ty, body } => ExprKind::Loop {
                ty: self.block_type(ty)?,
                body: self.copy_list(id, body)?,
            },
            ExprKind::If {
                ty,
                condition,
                then_body,
                else_body,
            } => {
                let ty = self.block_type(ty)?;
                let condition = self.copy_list(id, condition)?;
                let then_body = self.copy_list(id, then_body)?;
                let else_body = match else_body {
                    Some(range) => Some(self.copy_list(id, range)?),
                    None => None,
                };
                ExprKind::If {
                    ty,
                    condition,
                    then_body,
                    else_body,
                }
            }
            ExprKind::Instr { op, operands } => {
                let operands = self.copy_list(id, operands)?;
                ExprKind::Instr {
                    op: self.instr(op)?,
                    operands,
                }
            }
        };
        self.dst.arena_mut().alloc(copied)
    }

    fn copy_list(&mut self, parent: ExprId, range: ExprRange) -> Result<ExprRange, IrError> {
        let src = self.src;
        let children = src.arena().try_list(range)?;
        let mut copied = Vec::with_capacity(children.len());
        for &child in children {
            if child >= parent {
                return Err(IrError::NotATree { parent, child });
            }
            copied.push(self.copy(child)?);
        }
        self.dst.arena_mut().alloc_list(&copied)
    }

    fn block_type(&mut self, ty: BlockType) -> Result<BlockType, IrError> {
        match ty {
            BlockType::Func(sig) => {
                let signature = self
                    .src
                    .signature(sig)
                    .ok_or(IrError::DanglingSig(sig))?
                    .clone();
                Ok(BlockType::Func(self.dst.intern_signature(signature)?))
            }
            BlockType::Empty | BlockType::Value(_) => Ok(ty),
        }
    }

    fn instr(&mut self, op: Instr) -> Result<Instr, IrError> {
        match op {
            Instr::BrTable { targets, default } => {
                let src = self.src;
                let depths = src.arena().try_targets(targets)?;
                Ok(Instr::BrTable {
                    targets: self.dst.arena_mut().alloc_targets(depths)?,
                    default,
                })
            }
            Instr::CallIndirect { sig, table } => {
                let signature = self
                    .src
                    .signature(sig)
                    .ok_or(IrError::DanglingSig(sig))?
                    .clone();
                Ok(Instr::CallIndirect {
                    sig: self.dst.intern_signature(signature)?,
                    table,
                })
            }
            other => Ok(other),
        }
    }
}
