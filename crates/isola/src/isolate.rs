//! Copying one function body into a module of its own.

use isola_ir::{copy_expr, subtree_size, Function, Module};

use crate::error::IsolateError;

/// Name given to the single function of an isolated module.
pub const ISOLATED_FUNCTION_NAME: &str = "isolated";

/// Build a new module holding only a copy of function `index` of `module`.
///
/// The copy keeps the function's signature and declared locals. Nothing else
/// of the source module is carried over: no imports, tables, memories,
/// globals, exports or other functions. The result owns every node it
/// refers to, so `module` may be dropped while the copy lives on.
///
/// The source module is never changed. On failure no partial module is
/// returned.
#[tracing::instrument(level = "debug", skip(module))]
pub fn isolate(module: &Module, index: usize) -> Result<Module, IsolateError> {
    let count = module.function_count();
    let function = module
        .function(index)
        .ok_or(IsolateError::OutOfRange { index, count })?;
    let body = function.body().ok_or(IsolateError::Bodyless { index })?;

    let mut isolated = Module::try_with_capacity(subtree_size(module, body)?)?;
    let root = copy_expr(module, body, &mut isolated)?;
    isolated.add_function(Function::new(
        ISOLATED_FUNCTION_NAME,
        function.signature().clone(),
        function.locals(),
        root,
    ))?;
    tracing::debug!(
        source = function.name(),
        nodes = isolated.arena().len(),
        "isolated function"
    );
    Ok(isolated)
}

/// [`isolate`], answering every failure with an empty module.
///
/// The empty module is still a real module: it validates, renders as
/// `(module)` and reports zero functions.
pub fn isolate_or_empty(module: &Module, index: usize) -> Module {
    isolate(module, index).unwrap_or_else(|err| {
        tracing::debug!(%err, "isolation failed, using an empty module");
        Module::new()
    })
}

#[cfg(test)]
mod tests;
