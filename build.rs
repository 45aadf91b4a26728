use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| UNKNOWN.to_string());
    let status = match command_stdout("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean".to_string(),
        Some(_) => "dirty".to_string(),
        None => UNKNOWN.to_string(),
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| UNKNOWN.to_string());

    emit("HASH", &hash);
    emit("STATUS", &status);
    emit("TIMESTAMP", &timestamp);
    emit("TARGET", &env::var("TARGET").unwrap_or_else(|_| UNKNOWN.to_string()));
    emit("PROFILE", &env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_string()));
    emit("RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env=SPLIT_LEDGER_BUILD_{key}={value}");
}

/// Trimmed stdout of a successful command. `git status --porcelain` may be
/// legitimately empty, so emptiness is left to the caller.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
