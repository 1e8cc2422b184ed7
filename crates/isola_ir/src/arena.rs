//! Expression arena.
//!
//! Struct-of-arrays storage owned by exactly one [`Module`](crate::Module):
//!
//! - `kinds`: node payloads indexed by [`ExprId`]
//! - `expr_lists`: flattened child lists indexed by [`ExprRange`]
//! - `br_targets`: flattened `br_table` depths indexed by [`TargetRange`]
//!
//! Nodes are append-only. A child is always allocated before its parent, so
//! every child id is strictly smaller than its parent's id.

use crate::error::IrError;
use crate::expr_id::{ExprId, ExprRange, TargetRange};
use crate::instr::ExprKind;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    expr_lists: Vec<ExprId>,
    br_targets: Vec<u32>,
}

fn to_u32(len: usize, what: &'static str) -> Result<u32, IrError> {
    u32::try_from(len).map_err(|_| IrError::IndexOverflow { what })
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `nodes` more nodes, `list_entries` more child ids and
    /// `targets` more `br_table` depths.
    ///
    /// Fails instead of aborting when the allocator refuses.
    pub fn try_reserve(
        &mut self,
        nodes: usize,
        list_entries: usize,
        targets: usize,
    ) -> Result<(), IrError> {
        self.kinds
            .try_reserve(nodes)
            .map_err(|source| IrError::Exhausted { what: "expression nodes", source })?;
        self.expr_lists
            .try_reserve(list_entries)
            .map_err(|source| IrError::Exhausted { what: "expression lists", source })?;
        self.br_targets
            .try_reserve(targets)
            .map_err(|source| IrError::Exhausted { what: "branch tables", source })
    }

    /// Allocate a node, returning its ID.
    pub fn alloc(&mut self, kind: ExprKind) -> Result<ExprId, IrError> {
        let id = to_u32(self.kinds.len(), "expression nodes")?;
        if id == u32::MAX {
            return Err(IrError::IndexOverflow { what: "expression nodes" });
        }
        self.kinds.push(kind);
        Ok(ExprId::new(id))
    }

    /// Get a node's payload, or `None` if `id` is not a node of this arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> Option<&ExprKind> {
        self.kinds.get(id.index())
    }

    /// Allocate a contiguous child list.
    pub fn alloc_list(&mut self, ids: &[ExprId]) -> Result<ExprRange, IrError> {
        if ids.is_empty() {
            return Ok(ExprRange::EMPTY);
        }
        let start = to_u32(self.expr_lists.len(), "expression lists")?;
        let len = to_u32(ids.len(), "expression list")?;
        to_u32(self.expr_lists.len() + ids.len(), "expression lists")?;
        self.expr_lists.extend_from_slice(ids);
        Ok(ExprRange::new(start, len))
    }

    /// Get the child IDs of a range, or `None` if it reaches past the storage.
    pub fn list(&self, range: ExprRange) -> Option<&[ExprId]> {
        if range.is_empty() {
            return Some(&[]);
        }
        let start = range.start as usize;
        self.expr_lists.get(start..start + range.len())
    }

    /// Like [`list`](Self::list), reporting a dangling range as an error.
    pub fn try_list(&self, range: ExprRange) -> Result<&[ExprId], IrError> {
        self.list(range).ok_or(IrError::DanglingRange {
            start: range.start,
            len: range.len,
        })
    }

    /// Allocate a `br_table` label list.
    pub fn alloc_targets(&mut self, depths: &[u32]) -> Result<TargetRange, IrError> {
        if depths.is_empty() {
            return Ok(TargetRange::EMPTY);
        }
        let start = to_u32(self.br_targets.len(), "branch tables")?;
        let len = to_u32(depths.len(), "branch table")?;
        to_u32(self.br_targets.len() + depths.len(), "branch tables")?;
        self.br_targets.extend_from_slice(depths);
        Ok(TargetRange::new(start, len))
    }

    pub fn targets(&self, range: TargetRange) -> Option<&[u32]> {
        if range.is_empty() {
            return Some(&[]);
        }
        let start = range.start as usize;
        self.br_targets.get(start..start + range.len())
    }

    pub fn try_targets(&self, range: TargetRange) -> Result<&[u32], IrError> {
        self.targets(range).ok_or(IrError::DanglingRange {
            start: range.start,
            len: range.len,
        })
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Number of `br_table` depths stored.
    pub fn target_count(&self) -> usize {
        self.br_targets.len()
    }
}
