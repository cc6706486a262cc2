use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_assignerd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn assignerd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

/// Plant a stored payload behind the sidecar's back, the way a crashed
/// writer or a foreign tool would leave one.
fn plant_payload(workspace: &PathBuf, key: &str, payload: &str) {
    let conn = rusqlite::Connection::open(workspace.join("assigner.sqlite3"))
        .expect("open workspace db");
    conn.execute(
        "INSERT INTO assigner_history(key, payload, updated_at) VALUES(?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        rusqlite::params![key, payload, "2026-01-01T00:00:00Z"],
    )
    .expect("plant payload");
}

#[test]
fn unreadable_payload_is_reset_and_reported() {
    let workspace = temp_dir("assignerd-unreadable-history");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    plant_payload(&workspace, "class-8d/jobs", "not json at all {{{");

    let stored = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "history.get",
        json!({ "historyKey": "class-8d/jobs" }),
    );
    assert_eq!(stored["exists"], json!(true));
    assert_eq!(stored["historyReset"], json!(true));
    assert_eq!(stored["history"]["completions"], json!({}));
    assert_eq!(stored["history"]["totalAssignments"], json!({}));
}

#[test]
fn malformed_payload_is_discarded_and_the_run_starts_fresh() {
    let workspace = temp_dir("assignerd-malformed-history");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Valid JSON, wrong shape: counts where maps belong.
    plant_payload(
        &workspace,
        "class-8d/jobs",
        r#"{"completions": 5, "totalAssignments": "x"}"#,
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "assigner.run",
        json!({
            "historyKey": "class-8d/jobs",
            "participants": [
                { "id": "a", "label": "Avery" },
                { "id": "b", "label": "Blake" },
            ],
            "items": [{ "id": "x", "label": "Board" }],
        }),
    );
    assert_eq!(result["historyReset"], json!(true));
    // The run proceeded from a fresh record: exactly one assignment made.
    let totals = result["history"]["totalAssignments"]
        .as_object()
        .expect("totals map");
    let grand_total: u64 = totals.values().map(|v| v.as_u64().expect("count")).sum();
    assert_eq!(grand_total, 1);

    // The save repaired the blob; the next read is clean.
    let stored = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "history.get",
        json!({ "historyKey": "class-8d/jobs" }),
    );
    assert_eq!(stored["exists"], json!(true));
    assert_eq!(stored["historyReset"], json!(false));
    assert_eq!(stored["history"], result["history"]);
}
