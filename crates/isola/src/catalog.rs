//! Read-only queries over a module's functions.
//!
//! Every query is total: an out-of-range index answers `0`, `""` or `None`
//! instead of failing.

use isola_ir::{ExprId, ExprTag, Module};

/// Number of functions, imported ones included.
pub fn function_count(module: &Module) -> usize {
    module.function_count()
}

/// Name of function `index`, or `""` when it is unnamed or out of range.
pub fn function_name(module: &Module, index: usize) -> &str {
    module.function(index).map_or("", |function| function.name())
}

/// Name of the first function, or `""` for a module without functions.
pub fn first_function_name(module: &Module) -> &str {
    function_name(module, 0)
}

/// Parameter count of function `index`, or `0` when out of range.
pub fn param_arity(module: &Module, index: usize) -> usize {
    module
        .function(index)
        .map_or(0, |function| function.signature().param_arity())
}

/// Result count of function `index`, or `0` when out of range.
pub fn result_arity(module: &Module, index: usize) -> usize {
    module
        .function(index)
        .map_or(0, |function| function.signature().result_arity())
}

/// Root expression of function `index`; `None` for imports and out-of-range
/// indices.
pub fn function_body(module: &Module, index: usize) -> Option<ExprId> {
    module.function(index)?.body()
}

/// Kind tag of `expr`, or `None` if it is not a node of `module`.
pub fn expression_tag(module: &Module, expr: ExprId) -> Option<ExprTag> {
    module.arena().get(expr).map(isola_ir::ExprKind::tag)
}
