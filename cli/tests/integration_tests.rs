use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_paramspec"))
        .args(args)
        .output()
        .expect("failed to run paramspec")
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("failed to write fixture");
    path
}

/// A login schema using one custom validator.
fn write_login_schema(dir: &Path) -> PathBuf {
    let json = serde_json::json!({
        "name": "Login",
        "params": [
            { "name": "user", "constraints": ["no_whitespace"] },
            { "name": "password", "type": "non_empty_string", "validators": ["good_password"] },
            { "name": "remember", "type": "boolean", "required": false },
            { "name": "attempts", "type": "integer", "default": "0" }
        ]
    });
    write(
        dir,
        "login.json",
        &serde_json::to_string_pretty(&json).unwrap(),
    )
}

fn write_config(dir: &Path) -> PathBuf {
    write(
        dir,
        "paramspec.yml",
        r#"version: "1.0"
whitelist: [cachebuster]
validators:
  - id: good_password
    kind: common_passwords
"#,
    )
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ---------------------------------------------------------------------------
// Generate tests
// ---------------------------------------------------------------------------

#[test]
fn generate_writes_accessors_and_index() {
    let dir = tempfile::tempdir().unwrap();
    write_login_schema(dir.path());
    write(dir.path(), "search.yaml", "name: SearchQuery\nparams:\n  - name: q\n");
    let out = dir.path().join("out");

    let output = run(&[
        "generate",
        path_str(dir.path()),
        "--output",
        path_str(&out),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated 2 accessor(s)"), "stdout: {stdout}");

    let login = fs::read_to_string(out.join("login.rs")).unwrap();
    assert!(login.contains("pub struct LoginParams {"));
    assert!(login.contains("pub fn attempts(&self) -> i32"));
    let index = fs::read_to_string(out.join("mod.rs")).unwrap();
    assert!(index.contains("pub mod search_query;"));
    assert!(index.contains("pub use login::LoginParams;"));
}

#[test]
fn generate_uses_configured_output() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_login_schema(dir.path());
    let out = dir.path().join("from_config");
    let config = write(
        dir.path(),
        "paramspec.yml",
        &format!("output: {}\n", path_str(&out)),
    );

    let output = run(&[
        "--config",
        path_str(&config),
        "generate",
        path_str(&schema),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(out.join("login.rs").exists());
}

#[test]
fn generate_refuses_reserved_parameter_names() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(
        dir.path(),
        "bad.json",
        r#"{"name":"Bad","params":[{"name":"to_map"}]}"#,
    );
    let out = dir.path().join("out");

    let output = run(&["generate", path_str(&schema), "--output", path_str(&out)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("to_map"), "stderr: {stderr}");
    assert!(!out.join("bad.rs").exists());
}

// ---------------------------------------------------------------------------
// Validate tests
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_login_schema(dir.path());

    let output = run(&["validate", path_str(&schema)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Validated 1 schema file(s) containing 1 schema(s)."));
}

#[test]
fn validate_reports_bad_default() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write(
        dir.path(),
        "bad.json",
        r#"{"name":"Bad","params":[{"name":"count","type":"integer","default":"five"}]}"#,
    );

    let output = run(&["validate", path_str(&schema)]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "stderr: {stderr}");
    assert!(stderr.contains("bad default value for count"), "stderr: {stderr}");
}

#[test]
fn validate_rejects_cross_schema_collisions() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.json", r#"{"name":"A_B"}"#);
    write(dir.path(), "b.json", r#"{"name":"AB"}"#);

    let output = run(&["validate", path_str(dir.path())]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("would both generate type 'ABParams'"), "stderr: {stderr}");

    let out = dir.path().join("out");
    let output = run(&["generate", path_str(dir.path()), "--output", path_str(&out)]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn validate_rejects_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["validate", path_str(&dir.path().join("nope.json"))]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

// ---------------------------------------------------------------------------
// Check tests
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_input_with_whitelisted_key() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_login_schema(dir.path());
    let config = write_config(dir.path());
    let input = write(
        dir.path(),
        "input.json",
        r#"{"user":"ada","password":"correct horse","remember":"true","cachebuster":"123"}"#,
    );

    let output = run(&[
        "--config",
        path_str(&config),
        "check",
        "--schema",
        path_str(&schema),
        "--input",
        path_str(&input),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stdout).contains("OK: input satisfies 'Login'."));
}

#[test]
fn check_lists_every_problem() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_login_schema(dir.path());
    let config = write_config(dir.path());

    let output = run(&[
        "--config",
        path_str(&config),
        "check",
        "--schema",
        path_str(&schema),
        "-p",
        "user=a b",
        "-p",
        "password=password",
        "-p",
        "remember=maybe",
        "-p",
        "zeta=1",
        "-p",
        "alpha=2",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("user may not contain whitespace: 'a b'"), "stdout: {stdout}");
    assert!(stdout.contains("That password is too commonly used"), "stdout: {stdout}");
    assert!(stdout.contains("remember is not a boolean value: 'maybe'"), "stdout: {stdout}");
    assert!(stdout.contains("Parameters contains unknown keys: alpha, zeta"), "stdout: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("4 problem(s) found checking 'Login'"), "stderr: {stderr}");
}

#[test]
fn check_fails_on_unregistered_validator() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_login_schema(dir.path());

    let output = run(&[
        "check",
        "--schema",
        path_str(&schema),
        "-p",
        "user=ada",
        "-p",
        "password=secret99",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("good_password"));
}

#[test]
fn check_requires_name_for_packages() {
    let dir = tempfile::tempdir().unwrap();
    let package = write(
        dir.path(),
        "pkg.json",
        r#"{"version":"1.0.0","schemas":[{"name":"A","params":[{"name":"x"}]},{"name":"B"}]}"#,
    );

    let output = run(&["check", "--schema", path_str(&package)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("pick one with --name"));

    let output = run(&["check", "--schema", path_str(&package), "--name", "A"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Missing x"));
}

// ---------------------------------------------------------------------------
// Bundle tests
// ---------------------------------------------------------------------------

#[test]
fn bundle_writes_hashed_package() {
    let dir = tempfile::tempdir().unwrap();
    write_login_schema(dir.path());
    write(dir.path(), "search.yaml", "name: SearchQuery\n");
    let bundle = dir.path().join("dist").join("bundle.json");

    let output = run(&[
        "bundle",
        path_str(dir.path()),
        "--output",
        path_str(&bundle),
        "--name",
        "web",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let raw = fs::read_to_string(&bundle).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["name"], "web");
    assert_eq!(value["schemas"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["bundle_hash"].as_str().map(str::len), Some(64));

    let output = run(&["validate", path_str(&bundle)]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("containing 2 schema(s)"));
}

#[test]
fn bundle_rejects_duplicate_schema_names() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.json", r#"{"name":"Same"}"#);
    write(dir.path(), "b.json", r#"{"name":"Same"}"#);

    let output = run(&[
        "bundle",
        path_str(dir.path()),
        "--output",
        path_str(&dir.path().join("bundle.json")),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate schema in package: Same"));
}
