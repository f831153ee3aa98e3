use predicates::prelude::*;
use std::error::Error;
use std::fs;

#[test]
fn encode_then_decode_round_trips() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let json_path = dir.path().join("input.json");
    let bin_path = dir.path().join("output.jspl");

    fs::write(&json_path, "{ \"user\" : \"alice\", \"level\" : 3 }")?;

    assert_cmd::Command::cargo_bin("jsplice")?
        .args([
            "encode",
            json_path.to_str().unwrap(),
            "-o",
            bin_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_cmd::Command::cargo_bin("jsplice")?
        .args(["decode", bin_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("{\"user\":\"alice\",\"level\":3}"));

    Ok(())
}

#[test]
fn encode_reads_stdin() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("jsplice")?
        .args(["encode", "-"])
        .write_stdin("[1,2,3]")
        .assert()
        .success();

    Ok(())
}

#[test]
fn encode_rejects_invalid_json() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("jsplice")?
        .args(["encode", "-"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));

    Ok(())
}

#[test]
fn decode_rejects_garbage() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let bin_path = dir.path().join("garbage.jspl");
    fs::write(&bin_path, [0x00, 0x01, 0x02])?;

    assert_cmd::Command::cargo_bin("jsplice")?
        .args(["decode", bin_path.to_str().unwrap()])
        .assert()
        .failure();

    Ok(())
}

#[test]
fn check_passes_a_clean_corpus() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let corpus = dir.path().join("corpus.ndjson");

    fs::write(
        &corpus,
        concat!(
            "{\"a\": 1}\n",
            "[1, 2.5, \"three\", true, null]\n",
            "{\"nested\": {\"deep\": [{}]}}\n",
            "\"string with \\u00e9scapes\\n\"\n",
            "-12345678901234\n",
        ),
    )?;

    assert_cmd::Command::cargo_bin("jsplice")?
        .args(["check", corpus.to_str().unwrap(), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 checked, 0 skipped, 0 divergent"));

    Ok(())
}

#[test]
fn check_skips_lines_that_do_not_encode() -> Result<(), Box<dyn Error>> {
    assert_cmd::Command::cargo_bin("jsplice")?
        .args(["check", "--quiet"])
        .write_stdin("{\"ok\": true}\nnot json at all\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 checked, 1 skipped, 0 divergent"));

    Ok(())
}
