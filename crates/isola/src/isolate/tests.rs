use pretty_assertions::assert_eq;

use super::*;
use isola_ir::{Signature, ValType};

fn fixture() -> Module {
    isola_wasm::decode_text(
        r#"(module
            (import "env" "log" (func $log (param i32)))
            (memory 1)
            (global $counter (mut i32) (i32.const 0))
            (func $f (param i32) (result i32) (local i64)
                (i32.add (local.get 0) (i32.const 1)))
            (func $g)
            (export "f" (func $f)))"#,
    )
    .unwrap()
}

#[test]
fn isolated_module_holds_one_function() {
    let isolated = isolate(&fixture(), 1).unwrap();
    assert_eq!(isolated.function_count(), 1);
    let function = isolated.function(0).unwrap();
    assert_eq!(function.name(), ISOLATED_FUNCTION_NAME);
    assert_eq!(
        function.signature(),
        &Signature::new(&[ValType::I32], &[ValType::I32])
    );
    assert_eq!(function.locals(), &[ValType::I64]);
    assert!(isolated.memories().is_empty());
    assert!(isolated.globals().is_empty());
    assert!(isolated.exports().is_empty());
}

#[test]
fn isolated_text_is_the_copied_body() {
    let isolated = isolate(&fixture(), 1).unwrap();
    assert_eq!(
        isola_print::print_to_string(&isolated).unwrap(),
        "\
(module
  (func $isolated (param i32) (result i32) (local i64)
    (i32.add
      (local.get 0)
      (i32.const 1)
    )
  )
)
"
    );
}

#[test]
fn copy_outlives_the_source() {
    let source = fixture();
    let before = isola_print::print_to_string(&source).unwrap();
    let isolated = isolate(&source, 2).unwrap();
    assert_eq!(isola_print::print_to_string(&source).unwrap(), before);
    drop(source);
    assert_eq!(
        isola_print::print_to_string(&isolated).unwrap(),
        "(module\n  (func $isolated)\n)\n"
    );
}

#[test]
fn imports_have_no_body() {
    assert_eq!(
        isolate(&fixture(), 0),
        Err(IsolateError::Bodyless { index: 0 })
    );
}

#[test]
fn out_of_range_reports_count() {
    assert_eq!(
        isolate(&fixture(), 3),
        Err(IsolateError::OutOfRange { index: 3, count: 3 })
    );
    assert_eq!(
        isolate(&Module::new(), 0),
        Err(IsolateError::OutOfRange { index: 0, count: 0 })
    );
}

#[test]
fn failures_fall_back_to_an_empty_module() {
    let module = fixture();
    for index in [0, 3, usize::MAX] {
        let empty = isolate_or_empty(&module, index);
        assert!(empty.is_empty());
        assert_eq!(empty.function_count(), 0);
    }
    assert_eq!(isolate_or_empty(&module, 1).function_count(), 1);
}

#[test]
fn isolating_twice_gives_equal_text() {
    let module = fixture();
    let first = isola_print::print_to_string(&isolate(&module, 1).unwrap()).unwrap();
    let second = isola_print::print_to_string(&isolate(&module, 1).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn dangling_body_is_malformed() {
    let mut module = Module::new();
    module
        .add_function(isola_ir::Function::new(
            "broken",
            Signature::empty(),
            &[],
            isola_ir::ExprId::new(7),
        ))
        .unwrap();
    assert!(matches!(
        isolate(&module, 0),
        Err(IsolateError::Malformed(isola_ir::IrError::DanglingExpr(_)))
    ));
}

#[test]
fn destination_holds_exactly_the_copied_tree() {
    let module = fixture();
    let body = module.function(1).unwrap().body().unwrap();
    let isolated = isolate(&module, 1).unwrap();
    assert_eq!(
        isolated.arena().len(),
        isola_ir::subtree_size(&module, body).unwrap()
    );
}
