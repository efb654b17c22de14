use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_lzgreedy").to_string()
}

#[test]
fn cli_parse_prints_operations() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let output = dir.path().join("ops.txt");
    std::fs::write(&input, b"abcabcabc").unwrap();

    let st = Command::new(bin())
        .arg("parse")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "L{a/61}\nL{b/62}\nL{c/63}\nM{3,6}\n"
    );
}

#[test]
fn cli_parse_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, b"aaaa").unwrap();

    let out = Command::new(bin())
        .args(["parse", "--stdout"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "L{a/61}\nM{1,3}\n");
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let output = dir.path().join("ops.txt");
    std::fs::write(&input, b"payload").unwrap();
    std::fs::write(&output, b"existing").unwrap();

    let st = Command::new(bin())
        .arg("parse")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&output).unwrap(), b"existing");

    let st = Command::new(bin())
        .args(["--force", "parse"])
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
}

#[test]
fn cli_check_only_with_json_stats() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, b"abcabcabc").unwrap();

    let out = Command::new(bin())
        .args(["--json", "parse", "--check-only"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8(out.stderr).unwrap();
    let start = stderr.find('{').unwrap();
    let json: serde_json::Value = serde_json::from_str(&stderr[start..]).unwrap();
    assert_eq!(json["command"], "parse");
    assert_eq!(json["input_size"], 9);
    assert_eq!(json["ops"], 4);
    assert_eq!(json["matches"], 1);
    assert_eq!(json["matched_bytes"], 6);
}

#[test]
fn cli_verify_roundtrips() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 977) as u8 ^ (i / 5000) as u8).collect();
    std::fs::write(&input, &data).unwrap();

    for level in ["0", "6", "9"] {
        let st = Command::new(bin())
            .args(["--quiet", "verify", "--level", level, "--dict-size", "16K"])
            .arg(&input)
            .status()
            .unwrap();
        assert!(st.success(), "level {level}");
    }
}

#[test]
fn cli_rejects_bad_buffer_size() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, b"payload").unwrap();

    let st = Command::new(bin())
        .args(["verify", "--buffer-size", "64"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(!st.success());
}

#[test]
fn cli_rejects_oversized_sizes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, b"payload").unwrap();

    for flags in [["--buffer-size", "1024G"], ["--dict-size", "1G"]] {
        let out = Command::new(bin())
            .arg("verify")
            .args(flags)
            .arg(&input)
            .output()
            .unwrap();
        assert_eq!(out.status.code(), Some(1), "{flags:?}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("exceeds max"), "{flags:?}: {stderr}");
    }
}

#[test]
fn cli_missing_input_fails() {
    let dir = tempdir().unwrap();
    let st = Command::new(bin())
        .args(["parse", "--check-only"])
        .arg(dir.path().join("missing.bin"))
        .status()
        .unwrap();
    assert!(!st.success());
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("MAX_MATCH_LEN=273"));
    assert!(stderr.contains("SHORT_DISTANCES=10"));
}
