use super::*;
use isola_ir::{ExprKind, ExprRange, Function, ImportName, Instr, Signature};

#[test]
fn identifier_characters() {
    assert!(is_id("f"));
    assert!(is_id("add_one"));
    assert!(is_id("std::vec::Vec<u8>::push"));
    assert!(is_id("a.b/c@d"));
    assert!(!is_id(""));
    assert!(!is_id("has space"));
    assert!(!is_id("paren("));
    assert!(!is_id("quote\""));
    assert!(!is_id("caf\u{e9}"));
}

#[test]
fn duplicate_and_illegal_names_have_no_id() {
    let mut module = Module::new();
    let body = module
        .arena_mut()
        .alloc(ExprKind::Instr {
            op: Instr::Nop,
            operands: ExprRange::EMPTY,
        })
        .unwrap();
    for name in ["dup", "dup", "ok", "", "not ok"] {
        module
            .add_function(Function::new(name, Signature::empty(), &[], body))
            .unwrap();
    }
    module
        .add_function(Function::imported(
            "imp",
            Signature::empty(),
            ImportName::new("env", "imp"),
        ))
        .unwrap();

    let ids = FuncIds::new(&module);
    assert_eq!(ids.get(0), None);
    assert_eq!(ids.get(1), None);
    assert_eq!(ids.get(2), Some("ok"));
    assert_eq!(ids.get(3), None);
    assert_eq!(ids.get(4), None);
    assert_eq!(ids.get(5), Some("imp"));
    assert_eq!(ids.get(6), None);
}

#[test]
fn strings_escape_non_printables() {
    let mut out = String::new();
    push_string(&mut out, b"hi \"there\"\\\n\x00\xff");
    assert_eq!(out, r#""hi \22there\22\5c\0a\00\ff""#);
}
