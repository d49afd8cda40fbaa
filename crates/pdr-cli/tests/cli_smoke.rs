use std::fs;
use std::process::Command;

const PROPERTIES: &str = r#"{
    "run-1": {"domain": "blocks", "problem": "p1.pddl", "algorithm": "latest:01-pdr-noop",
              "layer_size": [2, 3], "total_time": 0.5},
    "run-2": {"domain": "blocks", "problem": "p1.pddl", "algorithm": "latest:08-pdr-cegar",
              "layer_size": [4], "total_time": 0.25},
    "run-3": {"domain": "gripper", "problem": "p2.pddl", "algorithm": "latest:01-pdr-noop",
              "layer_size": 0, "total_time": 3.0}
}"#;

const CONFIG: &str = r#"
source:
  kind: attributes
  attributes: [layer_size, total_time]
category:
  by: domain
"#;

#[test]
fn scatter_writes_plot_and_prints_path() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let properties = dir.path().join("properties");
    let config = dir.path().join("report.yaml");
    fs::write(&properties, PROPERTIES).expect("write properties");
    fs::write(&config, CONFIG).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_pdr-lab"))
        .arg("scatter")
        .arg("--properties")
        .arg(&properties)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(dir.path().join("layer-vs-time"))
        .arg("--tex")
        .output()
        .expect("run pdr-lab");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let printed = String::from_utf8(output.stdout).expect("utf8");
    assert!(printed.trim().ends_with("layer-vs-time.tex"));
    assert!(dir.path().join("layer-vs-time.tex").exists());
}

#[test]
fn scatter_fails_on_unknown_scale() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let properties = dir.path().join("properties");
    let config = dir.path().join("report.yaml");
    fs::write(&properties, PROPERTIES).expect("write properties");
    fs::write(&config, format!("{CONFIG}scale: loglog\n")).expect("write config");

    let status = Command::new(env!("CARGO_BIN_EXE_pdr-lab"))
        .arg("scatter")
        .arg("--properties")
        .arg(&properties)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(dir.path().join("plot"))
        .status()
        .expect("run pdr-lab");
    assert!(!status.success());
}

#[test]
fn inspect_reports_inventory() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let properties = dir.path().join("properties");
    fs::write(&properties, PROPERTIES).expect("write properties");

    let output = Command::new(env!("CARGO_BIN_EXE_pdr-lab"))
        .arg("inspect")
        .arg("--properties")
        .arg(&properties)
        .output()
        .expect("run pdr-lab");
    assert!(output.status.success());
    let inventory: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(inventory["runs"], 3);
    assert_eq!(inventory["problems"], 2);
    assert_eq!(inventory["algorithms"].as_array().map(Vec::len), Some(2));
}

#[test]
fn scatter_reports_malformed_configuration() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let properties = dir.path().join("properties");
    let config = dir.path().join("report.yaml");
    fs::write(&properties, PROPERTIES).expect("write properties");
    fs::write(&config, "source: [unclosed").expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_pdr-lab"))
        .arg("scatter")
        .arg("--properties")
        .arg(&properties)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(dir.path().join("plot"))
        .output()
        .expect("run pdr-lab");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("serde.yaml_deserialize"), "{stderr}");
}

#[test]
fn relative_flag_switches_the_y_axis() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let properties = dir.path().join("properties");
    let config = dir.path().join("report.yaml");
    fs::write(&properties, PROPERTIES).expect("write properties");
    fs::write(
        &config,
        "source:\n  kind: comparison\n  attributes: [total_time]\n  algorithms: ['latest:01-pdr-noop', 'latest:08-pdr-cegar']\nscale: linear\nformat: json\n",
    )
    .expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_pdr-lab"))
        .arg("scatter")
        .arg("--properties")
        .arg(&properties)
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(dir.path().join("rel"))
        .arg("--relative")
        .output()
        .expect("run pdr-lab");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let spec: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("rel.json")).expect("read spec"))
            .expect("json");
    assert_eq!(
        spec["y_axis"]["label"],
        "latest:08-pdr-cegar / latest:01-pdr-noop"
    );
}

#[test]
fn inspect_prints_yaml_on_request() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let properties = dir.path().join("properties");
    fs::write(&properties, PROPERTIES).expect("write properties");

    let output = Command::new(env!("CARGO_BIN_EXE_pdr-lab"))
        .arg("inspect")
        .arg("--properties")
        .arg(&properties)
        .arg("--yaml")
        .output()
        .expect("run pdr-lab");
    assert!(output.status.success());
    let printed = String::from_utf8(output.stdout).expect("utf8");
    assert!(printed.contains("runs: 3"));
    assert!(printed.contains("problems: 2"));
}
