use pretty_assertions::assert_eq;

use super::*;

fn fixture() -> Module {
    isola_wasm::decode_text(
        r#"(module
            (import "env" "log" (func $log (param i32)))
            (func $f (param i32) (result i32)
                (i32.add (local.get 0) (i32.const 1)))
            (func $g))"#,
    )
    .unwrap()
}

#[test]
fn queries_through_a_handle() {
    let mut session = Session::new();
    let handle = session.insert(fixture());
    assert!(session.validate(handle));
    assert_eq!(session.function_count(handle), 3);
    assert_eq!(session.function_name(handle, 1), "f");
    assert_eq!(session.param_arity(handle, 1), 1);
    assert_eq!(session.result_arity(handle, 1), 1);
    assert_eq!(session.live_modules(), 1);
}

#[test]
fn missing_module_answers_neutrally() {
    let mut session = Session::new();
    assert!(!session.validate(None));
    assert_eq!(session.function_count(None), 0);
    assert_eq!(session.function_name(None, 0), "");
    assert_eq!(session.param_arity(None, 0), 0);
    assert_eq!(session.result_arity(None, 0), 0);
    let text = session.render(None);
    assert!(text.is_empty());
    session.release_text(Some(text));
    assert_eq!(session.live_texts(), 0);
    assert!(!session.dispose(None));
}

#[test]
fn negative_and_large_indices_are_out_of_range() {
    let mut session = Session::new();
    let handle = session.insert(fixture());
    for index in [-1, i32::MIN, 3, i32::MAX] {
        assert_eq!(session.function_name(handle, index), "");
        assert_eq!(session.param_arity(handle, index), 0);
        assert_eq!(session.result_arity(handle, index), 0);
    }
}

#[test]
fn isolate_adds_an_owned_module() {
    let mut session = Session::new();
    let source = session.insert(fixture());
    let isolated = session.isolate(source, 1);
    assert_eq!(session.live_modules(), 2);

    assert!(session.dispose(source));
    assert_eq!(session.function_count(isolated), 1);
    assert_eq!(session.function_name(isolated, 0), "isolated");
    assert!(session.validate(isolated));
    assert!(session.dispose(isolated));
    assert_eq!(session.live_modules(), 0);
}

#[test]
fn failed_isolation_yields_a_disposable_empty_module() {
    let mut session = Session::new();
    let source = session.insert(fixture());
    for index in [0, -5, 3] {
        let sentinel = session.isolate(source, index);
        assert!(sentinel.is_some());
        assert_eq!(session.function_count(sentinel), 0);
        let text = session.render(sentinel);
        assert_eq!(text.as_str(), "(module)\n");
        session.release_text(Some(text));
        assert!(session.dispose(sentinel));
    }
    let from_nothing = session.isolate(None, 0);
    assert_eq!(session.function_count(from_nothing), 0);
    assert!(session.dispose(from_nothing));
    assert!(session.dispose(source));
    assert_eq!(session.live_modules(), 0);
    assert_eq!(session.live_texts(), 0);
}

#[test]
fn double_dispose_is_a_no_op() {
    let mut session = Session::new();
    let handle = session.insert(Module::new());
    assert!(session.dispose(handle));
    assert!(!session.dispose(handle));
    assert_eq!(session.live_modules(), 0);
}

#[test]
fn stale_handles_do_not_reach_reused_slots() {
    let mut session = Session::new();
    let old = session.insert(Module::new());
    session.dispose(old);
    let new = session.insert(fixture());
    assert_ne!(old, new);
    assert_eq!(session.function_count(old), 0);
    assert_eq!(session.function_count(new), 3);
    assert!(!session.dispose(old));
    assert_eq!(session.live_modules(), 1);
}

#[test]
fn rendered_texts_are_counted_until_released() {
    let mut session = Session::new();
    let handle = session.insert(fixture());
    let first = session.render(handle);
    let second = session.render(handle);
    assert_eq!(first, second);
    assert_eq!(session.live_texts(), 2);
    session.release_text(Some(first));
    session.release_text(None);
    assert_eq!(session.live_texts(), 1);
    session.dispose(handle);
    assert!(second.as_str().contains("(func $f"));
    session.release_text(Some(second));
    assert_eq!(session.live_texts(), 0);
}

#[test]
fn load_failure_gives_no_handle() {
    let mut session = Session::new();
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(session.load(&dir.path().join("missing.wasm")), None);
    assert_eq!(session.live_modules(), 0);
}
