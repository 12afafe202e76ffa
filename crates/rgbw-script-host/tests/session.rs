use std::{fs, path::PathBuf};

use pretty_assertions::assert_eq;
use rgbw_core::{write_report, GuestValue, HostOptions, ShaderState};
use rgbw_script_host::{HostError, ScriptSession};
use tempfile::TempDir;

fn script(src: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.lua");
    fs::write(&path, src).unwrap();
    (dir, path)
}

fn loaded(src: &str) -> (TempDir, ScriptSession) {
    let (dir, path) = script(src);
    let mut session = ScriptSession::open(HostOptions::with_script(path)).unwrap();
    session.load_script().unwrap();
    session.publish_state(&ShaderState::default()).unwrap();
    (dir, session)
}

fn numbers(session: &ScriptSession) -> Vec<Option<f64>> {
    let returned = session.invoke().unwrap();
    let mut nums: Vec<_> = session
        .read_result(returned)
        .unwrap()
        .into_iter()
        .map(|e| e.number)
        .collect();
    nums.sort_by(|a, b| a.partial_cmp(b).unwrap());
    nums
}

fn report(session: &ScriptSession) -> String {
    let entries = session.read_result(session.invoke().unwrap()).unwrap();
    let mut out = Vec::new();
    write_report(&mut out, &entries).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn state_global_has_exactly_five_fields() {
    let (_dir, session) = loaded(
        r#"
        function main()
            local out, n = {}, 0
            for k, v in pairs(state) do
                n = n + 1
                out[k] = v
            end
            out.count = n
            return out
        end
        "#,
    );
    let entries = session.read_result(session.invoke().unwrap()).unwrap();
    let get = |name: &str| {
        entries
            .iter()
            .find(|e| e.key == GuestValue::String(name.into()))
            .map(|e| e.number)
            .unwrap()
    };
    assert_eq!(entries.len(), 6);
    assert_eq!(get("count"), Some(5.0));
    for (name, value) in ShaderState::default().fields() {
        assert_eq!(get(name), Some(value), "{name}");
    }
}

#[test]
fn entry_point_gets_no_arguments() {
    let (_dir, session) = loaded(
        r#"
        function main(...)
            return { argc = select('#', ...), t = state.t }
        end
        "#,
    );
    assert_eq!(numbers(&session), vec![Some(0.0), Some(23.42)]);
}

#[test]
fn happy_path_returns_all_entries() {
    let (_dir, session) = loaded("function main() return { a = 1, b = 2 } end");
    let text = report(&session);
    assert_eq!(text.lines().filter(|l| *l == "string - number").count(), 2);
    assert!(text.contains("rgbw: 1.00\n"));
    assert!(text.contains("rgbw: 2.00\n"));
}

#[test]
fn every_key_is_enumerated_once() {
    let (_dir, session) = loaded(
        r#"
        function main()
            local t = {}
            for i = 1, 40 do t[i] = i end
            for i = 1, 10 do t["k" .. i] = i end
            return t
        end
        "#,
    );
    let entries = session.read_result(session.invoke().unwrap()).unwrap();
    assert_eq!(entries.len(), 50);
    let ints = entries.iter().filter(|e| matches!(e.key, GuestValue::Integer(_))).count();
    assert_eq!(ints, 40);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let options = HostOptions::with_script(dir.path().join("nope.lua"));
    let session = ScriptSession::open(options).unwrap();
    let err = session.load_script().unwrap_err();
    assert!(matches!(err, HostError::Read { .. }));
    let msg = err.to_string();
    assert!(msg.starts_with("cannot open "), "{msg}");
    assert!(msg.ends_with("nope.lua: No such file or directory"), "{msg}");
}

#[test]
fn syntax_error_is_a_load_error() {
    let (_dir, path) = script("function main(\n");
    let session = ScriptSession::open(HostOptions::with_script(path)).unwrap();
    let err = session.load_script().unwrap_err();
    assert!(matches!(err, HostError::Load(_)));
    assert!(err.to_string().contains("script.lua:"), "{err}");
}

#[test]
fn top_level_runtime_error_is_a_load_error() {
    let (_dir, path) = script("error('bad top level')\n");
    let session = ScriptSession::open(HostOptions::with_script(path)).unwrap();
    let err = session.load_script().unwrap_err();
    assert!(matches!(err, HostError::Load(_)));
    assert!(err.to_string().contains("bad top level"));
    assert!(!err.to_string().contains("stack traceback"));
}

#[test]
fn raising_entry_point_is_an_invoke_error() {
    let (_dir, session) = loaded("function main() error('boom') end");
    let err = session.invoke().unwrap_err();
    assert!(matches!(err, HostError::Invoke(_)));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn missing_entry_point_is_an_invoke_error() {
    let (_dir, session) = loaded("x = 1");
    let err = session.invoke().unwrap_err();
    assert_eq!(err.to_string(), "attempt to call a nil value");
}

#[test]
fn non_table_result_has_no_entries() {
    let (_dir, session) = loaded("function main() return 'hello' end");
    let returned = session.invoke().unwrap();
    assert_eq!(returned.guest(), GuestValue::String("hello".into()));
    assert!(session.read_result(returned).unwrap().is_empty());
    assert!(session.read_result(rgbw_script_host::ReturnValue::nil()).unwrap().is_empty());
}

#[test]
fn no_return_value_reads_as_nil() {
    let (_dir, session) = loaded("function main() end");
    assert_eq!(session.invoke().unwrap().guest(), GuestValue::Nil);
}

#[test]
fn non_numeric_values_do_not_crash() {
    let (_dir, session) = loaded(
        r#"function main() return { name = "red", on = true, level = "0.5" } end"#,
    );
    let text = report(&session);
    assert!(text.contains("string - string\nrgbw: 0.00\n"));
    assert!(text.contains("string - boolean\nrgbw: 0.00\n"));
    assert!(text.contains("string - string\nrgbw: 0.50\n"));
}

#[test]
fn strings_coerce_like_the_interpreter() {
    let (_dir, session) = loaded(
        r#"
        function main()
            return { "0x1p4", "0x10.8", "0x.8", " 0x10 ", "1e2", "red" }
        end
        "#,
    );
    let entries = session.read_result(session.invoke().unwrap()).unwrap();
    let nums: Vec<_> = entries.iter().map(|e| e.number).collect();
    assert_eq!(
        nums,
        vec![Some(16.0), Some(16.5), Some(0.5), Some(16.0), Some(100.0), None]
    );
    assert!(report(&session).starts_with("number - string\nrgbw: 16.00\n"));
}

#[test]
fn state_publishes_once() {
    let (_dir, mut session) = loaded("function main() return {} end");
    let err = session.publish_state(&ShaderState::default()).unwrap_err();
    assert!(matches!(err, HostError::AlreadyPublished(ref g) if g == "state"));
}

#[test]
fn print_host_is_available_to_guests() {
    let (_dir, session) = loaded(r#"function main() print_host("hi") return { ok = 1 } end"#);
    assert_eq!(numbers(&session), vec![Some(1.0)]);
    session.close();
}
