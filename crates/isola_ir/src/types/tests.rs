use super::*;

#[test]
fn signature_equality_is_elementwise() {
    let a = Signature::new(&[ValType::I32, ValType::F64], &[ValType::I64]);
    let b = Signature::new(&[ValType::I32, ValType::F64], &[ValType::I64]);
    let same_arity = Signature::new(&[ValType::I32, ValType::I32], &[ValType::I32]);
    assert_eq!(a, b);
    assert_ne!(a, same_arity);
    assert_eq!(a.param_arity(), same_arity.param_arity());
    assert_eq!(a.result_arity(), same_arity.result_arity());
}

#[test]
fn signature_display() {
    let sig = Signature::new(&[ValType::I32, ValType::ExternRef], &[]);
    assert_eq!(sig.to_string(), "[i32 externref] -> []");
    assert_eq!(Signature::empty().to_string(), "[] -> []");
}

#[test]
fn pool_deduplicates() {
    let mut pool = SignaturePool::new();
    let a = pool.intern(Signature::new(&[ValType::I32], &[ValType::I32]));
    let b = pool.intern(Signature::new(&[ValType::I64], &[]));
    let c = pool.intern(Signature::new(&[ValType::I32], &[ValType::I32]));
    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(pool.len(), 2);
}

#[test]
fn pool_lookup_out_of_range() {
    let pool = SignaturePool::new();
    assert!(pool.is_empty());
    assert_eq!(pool.get(SigId::new(0)), None);
}

#[test]
fn heap_keywords_only_for_references() {
    assert_eq!(ValType::FuncRef.heap_keyword(), Some("func"));
    assert_eq!(ValType::ExternRef.heap_keyword(), Some("extern"));
    assert_eq!(ValType::I32.heap_keyword(), None);
    assert!(ValType::ExternRef.is_ref());
    assert!(!ValType::V128.is_ref());
}
