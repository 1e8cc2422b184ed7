//! Errors raised while building or copying expression trees.

use std::collections::TryReserveError;

use crate::expr_id::ExprId;
use crate::types::SigId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// An index space of the module would exceed `u32::MAX` entries.
    #[error("{what} exceed the u32 index space")]
    IndexOverflow { what: &'static str },

    /// Allocation of arena storage failed.
    #[error("out of memory while allocating {what}: {source}")]
    Exhausted {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// An expression id does not name a node of the arena it was used with.
    #[error("dangling expression id {0:?}")]
    DanglingExpr(ExprId),

    /// A child range or `br_table` range reaches past the arena's list storage.
    #[error("dangling child range {start}+{len}")]
    DanglingRange { start: u32, len: u32 },

    /// A signature id does not name an entry of the module's pool.
    #[error("dangling signature id {0:?}")]
    DanglingSig(SigId),

    /// A child was allocated after its parent, so the node graph may not be a tree.
    #[error("expression {parent:?} refers to later expression {child:?}")]
    NotATree { parent: ExprId, child: ExprId },
}
