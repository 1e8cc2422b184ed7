use pretty_assertions::assert_eq;

use super::*;
use isola_ir::Function;
use wasmparser::BlockType as WasmBlockType;

/// Fold `ops` as the body of a function with `signature` and print the module.
fn fold(signature: Signature, ops: &[Operator<'_>]) -> Result<String, DecodeError> {
    let types = [Signature::new(&[ValType::I32], &[ValType::I32, ValType::I32])];
    let functions = [signature.clone()];
    let cx = Context {
        types: &types,
        functions: &functions,
    };
    let mut module = Module::new();
    let mut builder = BodyBuilder::new(&cx, &mut module, &signature);
    for (offset, op) in ops.iter().enumerate() {
        builder.operator(op, offset)?;
    }
    let root = builder.finish(ops.len())?;
    module.add_function(Function::new("f", signature, &[], root))?;
    Ok(isola_print::print_to_string(&module)?)
}

fn i32_to_i32() -> Signature {
    Signature::new(&[ValType::I32], &[ValType::I32])
}

#[test]
fn operands_fold_under_their_consumer() {
    let text = fold(
        i32_to_i32(),
        &[
            Operator::LocalGet { local_index: 0 },
            Operator::I32Const { value: 1 },
            Operator::I32Add,
            Operator::End,
        ],
    )
    .unwrap();
    assert_eq!(
        text,
        "\
(module
  (func $f (param i32) (result i32)
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
fn valueless_expressions_between_operands_are_adopted() {
    let text = fold(
        Signature::empty(),
        &[
            Operator::I32Const { value: 1 },
            Operator::Nop,
            Operator::I32Const { value: 2 },
            Operator::I32Add,
            Operator::Drop,
            Operator::End,
        ],
    )
    .unwrap();
    assert_eq!(
        text,
        "\
(module
  (func $f
    (drop
      (i32.add
        (i32.const 1)
        (nop)
        (i32.const 2)
      )
    )
  )
)
"
    );
}

#[test]
fn if_else_arms() {
    let text = fold(
        i32_to_i32(),
        &[
            Operator::LocalGet { local_index: 0 },
            Operator::If {
                blockty: WasmBlockType::Type(wasmparser::ValType::I32),
            },
            Operator::I32Const { value: 1 },
            Operator::Else,
            Operator::I32Const { value: 2 },
            Operator::End,
            Operator::End,
        ],
    )
    .unwrap();
    assert_eq!(
        text,
        "\
(module
  (func $f (param i32) (result i32)
    (if (result i32)
      (local.get 0)
      (then
        (i32.const 1)
      )
      (else
        (i32.const 2)
      )
    )
  )
)
"
    );
}

#[test]
fn multi_value_block_parameters_stay_outside() {
    let text = fold(
        Signature::new(&[], &[ValType::I32, ValType::I32]),
        &[
            Operator::I32Const { value: 7 },
            Operator::Block {
                blockty: WasmBlockType::FuncType(0),
            },
            Operator::I32Const { value: 8 },
            Operator::End,
            Operator::End,
        ],
    )
    .unwrap();
    assert_eq!(
        text,
        "\
(module
  (func $f (result i32 i32)
    (i32.const 7)
    (block (param i32) (result i32 i32)
      (i32.const 8)
    )
  )
)
"
    );
}

#[test]
fn branches_carry_label_values() {
    let text = fold(
        i32_to_i32(),
        &[
            Operator::Block {
                blockty: WasmBlockType::Type(wasmparser::ValType::I32),
            },
            Operator::I32Const { value: 3 },
            Operator::LocalGet { local_index: 0 },
            Operator::BrIf { relative_depth: 0 },
            Operator::End,
            Operator::End,
        ],
    )
    .unwrap();
    assert_eq!(
        text,
        "\
(module
  (func $f (param i32) (result i32)
    (block (result i32)
      (br_if 0
        (i32.const 3)
        (local.get 0)
      )
    )
  )
)
"
    );
}

#[test]
fn unreachable_code_takes_what_is_there() {
    let text = fold(
        Signature::empty(),
        &[
            Operator::Unreachable,
            Operator::I32Add,
            Operator::Drop,
            Operator::End,
        ],
    )
    .unwrap();
    assert_eq!(
        text,
        "\
(module
  (func $f
    (drop
      (i32.add
        (unreachable)
      )
    )
  )
)
"
    );
}

#[test]
fn else_outside_if_is_malformed() {
    let err = fold(Signature::empty(), &[Operator::Else, Operator::End]).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed { offset: 0, .. }), "{err}");
}

#[test]
fn unterminated_body_is_malformed() {
    let err = fold(Signature::empty(), &[Operator::Nop]).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed { offset: 1, .. }), "{err}");
}

#[test]
fn instructions_after_the_final_end_are_malformed() {
    let err = fold(Signature::empty(), &[Operator::End, Operator::Nop]).unwrap_err();
    assert!(matches!(err, DecodeError::Malformed { offset: 1, .. }), "{err}");
}

#[test]
fn calls_need_known_targets() {
    let err = fold(
        Signature::empty(),
        &[Operator::Call { function_index: 9 }, Operator::End],
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::Malformed { .. }), "{err}");
}

#[test]
fn tail_calls_are_unsupported() {
    let err = fold(
        Signature::empty(),
        &[Operator::ReturnCall { function_index: 0 }],
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::Unsupported { offset: 0, .. }), "{err}");
}
