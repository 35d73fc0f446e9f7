//! Runs the `preview_records` example end to end.
//!
//! Expectation: dynamb lines become one `post` line with the request body,
//! everything else becomes a `skip` line.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_temp_jsonl() -> std::path::PathBuf {
    let tmp = std::env::temp_dir().join(format!(
        "barnacles_agora_preview_test_{}.jsonl",
        std::process::id()
    ));
    fs::write(
        &tmp,
        r#"{"name":"dynamb","data":{"deviceId":"aa:bb","deviceIdType":2,"temperature":21.5,"relativeHumidity":4500}}

{"name":"raddec","data":{"transmitterId":"aa:bb","rssiSignature":[]}}"#,
    )
    .unwrap_or_else(|e| panic!("failed to write temporary JSONL file: {e}"));
    tmp
}

#[test]
fn example_preview_records_prints_scenario_body() {
    let path = write_temp_jsonl();
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--quiet",
        "--package",
        "barnacles-agora-core",
        "--example",
        "preview_records",
        "--",
        path.to_str()
            .unwrap_or_else(|| panic!("temporary path is not valid UTF-8: {path:?}")),
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("post\t["))
        .stdout(predicate::str::contains(
            r#"[{"sourceName":"aa:bb/2","className":"sensor","attributes":{"temperature-celsius":21.5,"humidity-percentage":45}}]"#,
        ))
        .stdout(predicate::str::contains("skip\traddec"));
}

#[test]
fn example_preview_records_accepts_stdin() {
    let input = r#"{"name":"dynamb","data":{"deviceId":"cc:dd","deviceIdType":3}}
{"name":"spatem","data":{}}"#;

    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--quiet",
        "--package",
        "barnacles-agora-core",
        "--example",
        "preview_records",
    ]);
    cmd.write_stdin(input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""sourceName":"cc:dd/3""#))
        .stdout(predicate::str::contains(r#""attributes":{}"#))
        .stdout(predicate::str::contains("skip\tspatem"));
}
