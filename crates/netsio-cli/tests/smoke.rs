#![cfg(not(target_arch = "wasm32"))]

use std::path::PathBuf;
use std::process::Command;

fn exe_path() -> PathBuf {
    let target_dir = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../..")
                .join("target")
        });
    let exe_name = format!("netsio-cli{}", std::env::consts::EXE_SUFFIX);
    let debug_exe = target_dir.join("debug").join(&exe_name);
    let release_exe = target_dir.join("release").join(&exe_name);
    if debug_exe.exists() {
        debug_exe
    } else if release_exe.exists() {
        release_exe
    } else {
        panic!(
            "expected netsio-cli binary at {} or {}",
            debug_exe.display(),
            release_exe.display()
        );
    }
}

#[test]
fn help_exits_successfully_and_documents_port_flag() {
    let output = Command::new(exe_path())
        .arg("--help")
        .output()
        .expect("failed to run netsio-cli");

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--port"), "stdout:\n{stdout}");
}

#[test]
fn test_cmd_without_a_peer_times_out_with_nonzero_exit() {
    let output = Command::new(exe_path())
        .args(["--port", "0", "--test-cmd", "--timeout-secs", "1"])
        .output()
        .expect("failed to run netsio-cli");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no NetSIO peer"), "stderr:\n{stderr}");
}
