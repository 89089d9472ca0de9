use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::cargo_bin("dex").expect("binary exists")
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn displays_help() {
    let mut cmd = cargo_bin();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Postman collections"));
}

#[test]
fn displays_version() {
    let mut cmd = cargo_bin();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn errors_when_input_missing() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path());
    cmd.arg("missing.csv");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn init_writes_template() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path());
    cmd.arg("init").arg("batch.csv");
    cmd.assert().success();

    temp.child("batch.csv").assert(predicate::str::starts_with(
        "Method,Endpoint,Resource,Querystring,Encoding\n",
    ));
}

#[test]
fn exports_collections_per_status_code() {
    let temp = assert_fs::TempDir::new().unwrap();
    let server = MockServer::start();
    let found = server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).body("{\"ok\":true}");
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path("/b").query_param("x", "1");
        then.status(404).body("not found");
    });

    temp.child("requests.csv")
        .write_str(&format!(
            "Method,Endpoint,Resource,Querystring,Encoding\n\
             GET,{base},/a,,utf-8\n\
             GET,{base},/b,x=1,utf-8\n",
            base = server.base_url()
        ))
        .unwrap();

    let mut cmd = cargo_bin();
    cmd.current_dir(temp.path());
    cmd.arg("requests.csv");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Successful Requests: 1"))
        .stdout(predicate::str::contains("Failed Requests: 1"))
        .stdout(predicate::str::contains("Done."));

    found.assert();
    missing.assert();

    let ok = read_json(&temp.path().join("collection_status_200.json"));
    assert_eq!(ok["info"]["name"], "Status Code 200 Collection");
    assert_eq!(ok["item"].as_array().unwrap().len(), 1);
    assert_eq!(ok["item"][0]["request"]["url"]["path"][0], "a");

    let not_found = read_json(&temp.path().join("collection_status_404.json"));
    assert_eq!(not_found["item"].as_array().unwrap().len(), 1);
    assert_eq!(not_found["item"][0]["request"]["url"]["query"][0]["key"], "x");
    assert_eq!(not_found["item"][0]["request"]["url"]["query"][0]["value"], "1");

    temp.child("requests.log")
        .assert(predicate::str::contains("url='GET "));
}

#[test]
fn second_run_removes_stale_collections() {
    let temp = assert_fs::TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/flaky");
        then.status(503);
    });
    server.mock(|when, then| {
        when.method(GET).path("/stable");
        then.status(200);
    });

    let csv = temp.child("requests.csv");
    csv.write_str(&format!(
        "Method,Endpoint,Resource,Querystring,Encoding\nGET,{},/flaky,,\n",
        server.base_url()
    ))
    .unwrap();
    cargo_bin()
        .current_dir(temp.path())
        .arg("requests.csv")
        .assert()
        .success();
    temp.child("collection_status_503.json")
        .assert(predicate::path::exists());

    csv.write_str(&format!(
        "Method,Endpoint,Resource,Querystring,Encoding\nGET,{},/stable,,\n",
        server.base_url()
    ))
    .unwrap();
    cargo_bin()
        .current_dir(temp.path())
        .arg("requests.csv")
        .arg("--output-dir")
        .arg(".")
        .assert()
        .success();

    temp.child("collection_status_503.json")
        .assert(predicate::path::missing());
    temp.child("collection_status_200.json")
        .assert(predicate::path::exists());
}

#[test]
fn header_flag_is_sent_and_exported() {
    let temp = assert_fs::TempDir::new().unwrap();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/secure").header("x-api-key", "secret");
        then.status(200);
    });

    temp.child("requests.csv")
        .write_str(&format!(
            "Method,Endpoint,Resource,Querystring,Encoding\nGET,{},/secure,,\n",
            server.base_url()
        ))
        .unwrap();

    cargo_bin()
        .current_dir(temp.path())
        .args(["requests.csv", "-H", "X-Api-Key: secret", "-o", "collections"])
        .assert()
        .success();

    mock.assert();
    let collection = read_json(&temp.path().join("collections/collection_status_200.json"));
    let headers = collection["item"][0]["request"]["header"].as_array().unwrap();
    assert!(headers
        .iter()
        .any(|h| h["key"] == "X-Api-Key" && h["value"] == "secret"));
}
