use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

const SEED: &str = "HyperEdge1\t10\t|\t1\t2\t3\t|\t2018-10-10\t2022-3-10\n\
HyperEdge2\t10\t|\t2\t3\t|\t2018-10-10\t2022-3-10\n\
HyperEdge3\t11\t|\t1\t4\t|\t2018-10-10\t2022-3-10\n";

const CONFIG: &str = "\
output:
  records_per_file: 50
pool:
  replenish_batch: 32
distributions:
  hypertype: { mean: 12.0, std_dev: 12.0 }
  edge_size: { mean: 3.0, std_dev: 3.0 }
  occurrence: { mean: 4.0, std_dev: 4.0 }
";

fn hyperamp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hyperamp"))
        .args(args)
        .output()
        .expect("run hyperamp")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn profile_then_amplify_with_calibration() {
    let dir = tempdir().unwrap();
    let seeds = dir.path().join("seeds");
    fs::create_dir_all(&seeds).unwrap();
    fs::write(seeds.join("part0.nt"), SEED).unwrap();
    let report = dir.path().join("report.txt");

    let output = hyperamp(&["profile", "--input", path_arg(&seeds), "--out", path_arg(&report)]);
    assert!(output.status.success(), "profile failed: {output:?}");
    let text = fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("htid\tcnt\n10\t2\n11\t1\n"));
    assert_eq!(text.matches("mu, sigma =").count(), 3);

    let out = dir.path().join("run");
    let output = hyperamp(&[
        "amplify",
        "--out",
        path_arg(&out),
        "--calibration",
        path_arg(&report),
        "--seed",
        "17",
        "--hyperedges",
        "120",
        "--vertices",
        "40",
    ]);
    assert!(output.status.success(), "amplify failed: {output:?}");
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(summary["hyperedges"].as_u64().unwrap() >= 120);
    assert!(summary["vertices"].as_u64().unwrap() >= 40);

    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["seed"], 17);
    assert_eq!(manifest["config"]["distributions"]["edge_size"]["calibrated"], true);
    assert!(out.join("str_normal").is_file());
    assert!(out.join("hyper_str_index").is_file());
    assert!(out.join("hyper_id_uni0.nt").is_file());
}

#[test]
fn amplify_reads_yaml_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("amplify.yaml");
    fs::write(&config, CONFIG).unwrap();
    let out = dir.path().join("run");

    let output = hyperamp(&[
        "--verbose",
        "amplify",
        "--out",
        path_arg(&out),
        "--config",
        path_arg(&config),
        "--hyperedges",
        "200",
        "--vertices",
        "10",
    ]);
    assert!(output.status.success(), "amplify failed: {output:?}");
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = summary["files"].as_array().unwrap();
    let hyperedges = summary["hyperedges"].as_u64().unwrap();
    assert_eq!(files.len() as u64, hyperedges.div_ceil(50));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("replenished vertex pool"));
}

#[test]
fn malformed_seed_aborts_profiling() {
    let dir = tempdir().unwrap();
    let seed = dir.path().join("bad.nt");
    fs::write(&seed, "HyperEdge1\tten\t|\t1\t|\t2018-10-10\t2022-3-10\n").unwrap();
    let report = dir.path().join("report.txt");

    let output = hyperamp(&["profile", "--input", path_arg(&seed), "--out", path_arg(&report)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad-hypertype-id"));
    assert!(!report.exists());
}
