use pretty_assertions::assert_eq;

use super::*;
use crate::emitter::FileEmitter;
use isola_ir::{
    DataSegment, ElemSegment, Export, ExportKind, LoadOp, NumOp, Signature, ValType,
};

fn node(module: &mut Module, op: Instr, operands: &[ExprId]) -> ExprId {
    let arena = module.arena_mut();
    let operands = arena.alloc_list(operands).unwrap();
    arena.alloc(ExprKind::Instr { op, operands }).unwrap()
}

fn leaf(module: &mut Module, op: Instr) -> ExprId {
    node(module, op, &[])
}

fn body(module: &mut Module, children: &[ExprId]) -> ExprId {
    let arena = module.arena_mut();
    let body = arena.alloc_list(children).unwrap();
    arena
        .alloc(ExprKind::Block {
            ty: BlockType::Empty,
            body,
            implicit: true,
        })
        .unwrap()
}

fn print(module: &Module) -> String {
    print_to_string(module).unwrap()
}

/// `f(i32) -> i32` adding one, and an empty `g`.
fn f_and_g() -> Module {
    let mut module = Module::new();
    let a = leaf(&mut module, Instr::LocalGet(0));
    let b = leaf(&mut module, Instr::I32Const(1));
    let add = node(&mut module, Instr::Numeric(NumOp::I32Add), &[a, b]);
    let f = body(&mut module, &[add]);
    let g = body(&mut module, &[]);
    let sig = Signature::new(&[ValType::I32], &[ValType::I32]);
    module.add_function(Function::new("f", sig, &[], f)).unwrap();
    module
        .add_function(Function::new("g", Signature::empty(), &[], g))
        .unwrap();
    module
}

#[test]
fn empty_module() {
    assert_eq!(print(&Module::new()), "(module)\n");
}

#[test]
fn functions_print_folded_with_inline_types() {
    assert_eq!(
        print(&f_and_g()),
        "\
(module
  (func $f (param i32) (result i32)
    (i32.add
      (local.get 0)
      (i32.const 1)
    )
  )
  (func $g)
)
"
    );
}

#[test]
fn printing_is_deterministic() {
    let module = f_and_g();
    assert_eq!(print(&module), print(&module));
}

#[test]
fn imports_come_first_then_sections() {
    let mut module = Module::new();
    module
        .add_function(Function::imported(
            "log",
            Signature::new(&[ValType::I32], &[]),
            ImportName::new("env", "log"),
        ))
        .unwrap();
    let seven = leaf(&mut module, Instr::I32Const(7));
    let call = node(&mut module, Instr::Call(0), &[seven]);
    let main = body(&mut module, &[call]);
    module
        .add_function(Function::new("main", Signature::empty(), &[], main))
        .unwrap();
    module.add_table(Table {
        element: ValType::FuncRef,
        min: 1,
        max: Some(1),
        import: None,
    });
    module.add_memory(Memory {
        min: 1,
        max: None,
        import: None,
    });
    module.add_global(Global {
        ty: ValType::I32,
        mutable: true,
        init: Some(ConstExpr::I32(0)),
        import: None,
    });
    module.add_export(Export {
        name: "main".into(),
        kind: ExportKind::Func,
        index: 1,
    });
    module.add_export(Export {
        name: "memory".into(),
        kind: ExportKind::Memory,
        index: 0,
    });
    module.set_start(1);
    module.add_element(ElemSegment {
        table: 0,
        offset: ConstExpr::I32(0),
        functions: Box::new([1]),
    });
    module.add_data(DataSegment {
        mode: DataMode::Active {
            memory: 0,
            offset: ConstExpr::I32(8),
        },
        bytes: b"hi\n".as_slice().into(),
    });

    assert_eq!(
        print(&module),
        "\
(module
  (import \"env\" \"log\" (func $log (param i32)))
  (func $main
    (call 0
      (i32.const 7)
    )
  )
  (table 1 1 funcref)
  (memory 1)
  (global (mut i32) (i32.const 0))
  (export \"main\" (func 1))
  (export \"memory\" (memory 0))
  (start 1)
  (elem (i32.const 0) func 1)
  (data (i32.const 8) \"hi\\0a\")
)
"
    );
}

#[test]
fn structured_control_flow() {
    let mut module = Module::new();
    let cond = leaf(&mut module, Instr::LocalGet(0));
    let one = leaf(&mut module, Instr::I32Const(1));
    let index = leaf(&mut module, Instr::LocalGet(0));
    let targets = module.arena_mut().alloc_targets(&[0]).unwrap();
    let table = node(&mut module, Instr::BrTable { targets, default: 0 }, &[index]);
    let inner_body = module.arena_mut().alloc_list(&[table]).unwrap();
    let inner = module
        .arena_mut()
        .alloc(ExprKind::Block {
            ty: BlockType::Empty,
            body: inner_body,
            implicit: false,
        })
        .unwrap();
    let two = leaf(&mut module, Instr::I32Const(2));
    let arena = module.arena_mut();
    let condition = arena.alloc_list(&[cond]).unwrap();
    let then_body = arena.alloc_list(&[one]).unwrap();
    let else_body = arena.alloc_list(&[inner, two]).unwrap();
    let iff = arena
        .alloc(ExprKind::If {
            ty: BlockType::Value(ValType::I32),
            condition,
            then_body,
            else_body: Some(else_body),
        })
        .unwrap();
    let root = body(&mut module, &[iff]);
    let sig = Signature::new(&[ValType::I32], &[ValType::I32]);
    module
        .add_function(Function::new("pick", sig, &[ValType::I64], root))
        .unwrap();

    assert_eq!(
        print(&module),
        "\
(module
  (func $pick (param i32) (result i32) (local i64)
    (if (result i32)
      (local.get 0)
      (then
        (i32.const 1)
      )
      (else
        (block
          (br_table 0 0
            (local.get 0)
          )
        )
        (i32.const 2)
      )
    )
  )
)
"
    );
}

#[test]
fn immediates_and_interned_types() {
    let mut module = Module::new();
    let indirect = module
        .intern_signature(Signature::new(&[ValType::F64], &[ValType::I64]))
        .unwrap();
    let pair = module
        .intern_signature(Signature::new(&[], &[ValType::I32, ValType::I32]))
        .unwrap();

    let addr = leaf(&mut module, Instr::I32Const(0));
    let memarg = MemArg {
        offset: 4,
        align: 0,
        memory: 0,
    };
    let load = node(
        &mut module,
        Instr::Load {
            op: LoadOp::I32Load,
            memarg,
        },
        &[addr],
    );
    let drop_load = node(&mut module, Instr::Drop, &[load]);
    let x = leaf(&mut module, Instr::F64Const(1.5f64.to_bits()));
    let slot = leaf(&mut module, Instr::I32Const(3));
    let call = node(
        &mut module,
        Instr::CallIndirect {
            sig: indirect,
            table: 0,
        },
        &[x, slot],
    );
    let drop_call = node(&mut module, Instr::Drop, &[call]);
    let nop = leaf(&mut module, Instr::Nop);
    let loop_body = module.arena_mut().alloc_list(&[nop]).unwrap();
    let lp = module
        .arena_mut()
        .alloc(ExprKind::Loop {
            ty: BlockType::Func(pair),
            body: loop_body,
        })
        .unwrap();
    let root = body(&mut module, &[drop_load, drop_call, lp]);
    module
        .add_function(Function::new("h", Signature::empty(), &[], root))
        .unwrap();

    assert_eq!(
        print(&module),
        "\
(module
  (func $h
    (drop
      (i32.load offset=4 align=1
        (i32.const 0)
      )
    )
    (drop
      (call_indirect (param f64) (result i64)
        (f64.const 0x1.8p+0)
        (i32.const 3)
      )
    )
    (loop (result i32 i32)
      (nop)
    )
  )
)
"
    );
}

#[test]
fn unnamed_and_duplicate_functions_print_without_ids() {
    let mut module = Module::new();
    let root = body(&mut module, &[]);
    for name in ["", "twin", "twin"] {
        module
            .add_function(Function::new(name, Signature::empty(), &[], root))
            .unwrap();
    }
    assert_eq!(print(&module), "(module\n  (func)\n  (func)\n  (func)\n)\n");
}

#[test]
fn dangling_body_is_an_error() {
    let mut module = Module::new();
    module
        .add_function(Function::new("f", Signature::empty(), &[], ExprId::new(5)))
        .unwrap();
    assert_eq!(
        print_to_string(&module),
        Err(PrintError::Malformed(IrError::DanglingExpr(ExprId::new(5))))
    );
}

#[test]
fn self_referencing_node_is_an_error() {
    let mut module = Module::new();
    let arena = module.arena_mut();
    let list = arena.alloc_list(&[ExprId::new(0)]).unwrap();
    let looped = arena
        .alloc(ExprKind::Instr {
            op: Instr::Drop,
            operands: list,
        })
        .unwrap();
    let root = body(&mut module, &[looped]);
    module
        .add_function(Function::new("f", Signature::empty(), &[], root))
        .unwrap();
    assert_eq!(
        print_to_string(&module),
        Err(PrintError::Malformed(IrError::NotATree {
            parent: looped,
            child: looped,
        }))
    );
}

#[test]
fn global_without_initializer_is_an_error() {
    let mut module = Module::new();
    module.add_global(Global {
        ty: ValType::I32,
        mutable: false,
        init: None,
        import: None,
    });
    assert_eq!(
        print_to_string(&module),
        Err(PrintError::MissingInitializer { index: 0 })
    );
}

#[test]
fn file_output_matches_string_output() {
    let module = f_and_g();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.wat");
    let mut emitter = FileEmitter::new(&path).unwrap();
    print_module(&module, &mut emitter).unwrap();
    emitter.finish().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), print(&module));
}
