use isola_ir::{ExprKind, Function, Instr};

use super::*;

/// `(func (result ..) (i32.const 1))` with the given result types.
fn const_function(results: &[ValType]) -> Module {
    let mut module = Module::new();
    let arena = module.arena_mut();
    let operands = arena.alloc_list(&[]).unwrap();
    let one = arena
        .alloc(ExprKind::Instr {
            op: Instr::I32Const(1),
            operands,
        })
        .unwrap();
    let body = arena.alloc_list(&[one]).unwrap();
    let root = arena
        .alloc(ExprKind::Block {
            ty: isola_ir::BlockType::Empty,
            body,
            implicit: true,
        })
        .unwrap();
    module
        .add_function(Function::new("f", Signature::new(&[], results), &[], root))
        .unwrap();
    module
}

#[test]
fn absent_module_is_invalid() {
    assert!(!validate(None));
}

#[test]
fn empty_module_is_valid() {
    assert!(validate(Some(&Module::new())));
}

#[test]
fn body_must_match_signature() {
    assert!(validate(Some(&const_function(&[ValType::I32]))));
    assert!(!validate(Some(&const_function(&[ValType::I64]))));
    assert!(!validate(Some(&const_function(&[]))));
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
