use assert_cmd::Command;
use serde_json::{Value, json};
use std::fs;

fn snapshot_json() -> String {
    json!({
        "changes": [
            {
                "id": "~", "unique_prefix": "~", "unique_suffix": "",
                "column": 0, "row": 0,
                "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z"
            },
            {
                "id": "qpvuntsm", "unique_prefix": "q", "unique_suffix": "pvuntsm",
                "description": "fix <parser>", "is_checked_out": true,
                "column": 0, "row": 1,
                "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-02T10:00:00Z"
            },
            {
                "id": "rlvkpnrz", "unique_prefix": "r", "unique_suffix": "lvkpnrz",
                "conflict_files": ["src/main.rs"],
                "column": 1, "row": 2,
                "created_at": "2024-04-01T10:00:00Z", "updated_at": "2024-04-01T10:00:00Z"
            }
        ],
        "edges": [
            { "from": "~", "to": "qpvuntsm" },
            { "from": "qpvuntsm", "to": "rlvkpnrz" },
            { "from": "rlvkpnrz", "to": "gone" }
        ]
    })
    .to_string()
}

#[test]
fn cli_layout_reads_stdin_and_prints_render_model() {
    let exe = assert_cmd::cargo_bin!("changeviz-cli");
    let output = Command::new(exe)
        .args(["layout", "--x-scale", "10"])
        .write_stdin(snapshot_json())
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let model: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(model["nodes"].as_array().map(Vec::len), Some(3));
    assert_eq!(model["edges"].as_array().map(Vec::len), Some(2));
    assert_eq!(model["dropped_edges"], json!(1));
    assert_eq!(model["nodes"][2]["x"], json!(20.0));
    assert_eq!(model["canvas"]["width"], json!(30.0));
}

#[test]
fn cli_render_writes_svg_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("snapshot.json");
    let out = tmp.path().join("graph.svg");
    fs::write(&input, snapshot_json()).expect("write snapshot");

    let exe = assert_cmd::cargo_bin!("changeviz-cli");
    Command::new(exe)
        .args([
            "render",
            "--id",
            "log",
            "--out",
            out.to_string_lossy().as_ref(),
            input.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with(r#"<svg id="log""#));
    assert!(svg.contains("fix &lt;parser&gt;"));
}

#[test]
fn cli_interact_replays_pointer_events() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("snapshot.json");
    let events = tmp.path().join("events.json");
    fs::write(&input, snapshot_json()).expect("write snapshot");
    fs::write(
        &events,
        json!([
            { "change_id": "rlvkpnrz", "target": "panel_entry", "action": "enter" },
            { "change_id": "rlvkpnrz", "target": "panel_entry", "action": "click" },
            { "change_id": "qpvuntsm", "target": "node", "action": "click" },
            { "change_id": "rlvkpnrz", "target": "node", "action": "leave" }
        ])
        .to_string(),
    )
    .expect("write events");

    let exe = assert_cmd::cargo_bin!("changeviz-cli");
    let output = Command::new(exe)
        .args([
            "interact",
            "--events",
            events.to_string_lossy().as_ref(),
            input.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let lines: Vec<Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(
        lines,
        vec![
            json!({ "event": "highlight_changed", "change_id": "rlvkpnrz", "highlighted": true }),
            json!({ "event": "checkout_requested", "change_id": "rlvkpnrz" }),
            json!({ "event": "highlight_changed", "change_id": "rlvkpnrz", "highlighted": false }),
        ]
    );
}

#[test]
fn cli_flags_override_config_file_keys() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("snapshot.json");
    let config = tmp.path().join("config.json");
    fs::write(&input, snapshot_json()).expect("write snapshot");
    fs::write(
        &config,
        json!({
            "layout": { "xScale": 12, "yScale": 50 },
            "theme": { "conflict": "#ff00ff" },
            "panel": { "emptyDescription": "(empty)" }
        })
        .to_string(),
    )
    .expect("write config");

    let exe = assert_cmd::cargo_bin!("changeviz-cli");
    let output = Command::new(exe)
        .args([
            "layout",
            "--config",
            config.to_string_lossy().as_ref(),
            "--y-scale",
            "30",
            input.to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let model: Value = serde_json::from_slice(&output.stdout).expect("json");
    // xScale from the file, yScale from the flag.
    assert_eq!(model["nodes"][2]["x"], json!(24.0));
    assert_eq!(model["nodes"][2]["y"], json!(90.0));
    assert_eq!(model["nodes"][2]["style"]["stroke"], json!("#ff00ff"));
    assert_eq!(
        model["panel"][2]["description"],
        json!({ "kind": "placeholder", "text": "(empty)" })
    );
}

#[test]
fn cli_rejects_non_positive_scale() {
    let exe = assert_cmd::cargo_bin!("changeviz-cli");
    Command::new(exe)
        .args(["layout", "--y-scale", "0"])
        .write_stdin(snapshot_json())
        .assert()
        .failure()
        .code(1);
}

#[test]
fn cli_interact_without_events_is_a_usage_error() {
    let exe = assert_cmd::cargo_bin!("changeviz-cli");
    Command::new(exe)
        .args(["interact"])
        .assert()
        .failure()
        .code(2);
}
