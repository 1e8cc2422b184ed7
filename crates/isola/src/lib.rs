//! Load WebAssembly modules and isolate single function bodies.
//!
//! A module is loaded from a binary (`.wasm`) or text (`.wat`) file, can be
//! validated and inspected through its function catalog, and any defined
//! function can be copied out into a fresh module holding only that body.
//! Modules and their bodies print as folded WebAssembly text.
//!
//! The free functions work on owned [`Module`] values. [`Session`] offers the
//! same operations through copyable handles with explicit disposal.

pub mod commands;
mod catalog;
mod error;
mod isolate;
mod load;
mod render;
mod session;

pub use catalog::{
    expression_tag, first_function_name, function_body, function_count, function_name,
    param_arity, result_arity,
};
pub use error::{IsolateError, LoadError};
pub use isolate::{isolate, isolate_or_empty, ISOLATED_FUNCTION_NAME};
pub use load::load;
pub use render::{dump, function_body_text, render, RenderedText, DUMP_BANNER};
pub use session::{ModuleHandle, Session};

pub use isola_ir::{ExprId, ExprTag, Module, Signature, ValType};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// `true` if `module` is present and valid WebAssembly.
pub fn validate(module: Option<&Module>) -> bool {
    module.is_some_and(isola_wasm::validate)
}

/// Initialize tracing subscriber for debugging.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=isola=debug` or `RUST_LOG=isola_wasm=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
