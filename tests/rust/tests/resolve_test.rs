use anyhow::Result;
use clap::Parser;
use launcher::Args;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use worker_config::{BackupPolicy, ConfigSource, Error, SystemSource};

// Environment from a map, files from the real filesystem
#[derive(Default)]
struct TestEnv {
    vars: HashMap<String, String>,
}

impl TestEnv {
    fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }
}

impl ConfigSource for TestEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        SystemSource.read_to_string(path)
    }
}

fn write_hostfile(dir: &TempDir, lines: &[&str]) -> Result<PathBuf> {
    let path = dir.path().join("hosts.txt");
    std::fs::write(&path, lines.join("\n"))?;
    Ok(path)
}

fn args(argv: &[&str]) -> Result<Args> {
    let mut full = vec!["dataflow-run"];
    full.extend_from_slice(argv);
    Ok(Args::try_parse_from(full)?)
}

#[test]
fn test_environment_only_cluster() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let hostfile = write_hostfile(&dir, &["localhost:1234", "localhost:5678", ""])?;

    let env = TestEnv::default()
        .with("BYTEWAX_HOSTFILE_PATH", hostfile.display().to_string())
        .with("BYTEWAX_POD_NAME", "stateful_set-0")
        .with("BYTEWAX_STATEFULSET_NAME", "stateful_set");

    let args = args(&["examples.basic:flow", "--env-prefix", "BYTEWAX_"])?;
    let config = launcher::resolve(&args, &env)?;

    assert_eq!(config.process_id(), 0);
    assert_eq!(
        config.addresses_joined().as_deref(),
        Some("localhost:1234;localhost:5678")
    );
    Ok(())
}

#[test]
fn test_hostfile_order_and_blank_lines() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let lines = [
        "",
        "  10.0.0.9:2101",
        "10.0.0.2:2101  ",
        "",
        "\t",
        "10.0.0.5:2101",
        "10.0.0.1:2101",
        "",
    ];
    let hostfile = write_hostfile(&dir, &lines)?;
    let env = TestEnv::default().with("HOSTFILE_PATH", hostfile.display().to_string());

    let config = launcher::resolve(&args(&["examples.basic:flow"])?, &env)?;

    assert_eq!(
        config.addresses_joined().as_deref(),
        Some("10.0.0.9:2101;10.0.0.2:2101;10.0.0.5:2101;10.0.0.1:2101")
    );
    assert_eq!(config.cluster_size(), 4);
    Ok(())
}

#[test]
fn test_pod_ordinal_becomes_process_id() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let peers: Vec<String> = (0..12).map(|i| format!("worker-{i}:2101")).collect();
    let peer_refs: Vec<&str> = peers.iter().map(String::as_str).collect();
    let hostfile = write_hostfile(&dir, &peer_refs)?;

    for (base, ordinal) in [("bytewax", 0), ("flow_workers", 3), ("wordcount", 11)] {
        let env = TestEnv::default()
            .with("HOSTFILE_PATH", hostfile.display().to_string())
            .with("POD_NAME", format!("{base}-{ordinal}"))
            .with("STATEFULSET_NAME", base);

        let config = launcher::resolve(&args(&["examples.basic:flow"])?, &env)?;
        assert_eq!(config.process_id(), ordinal);
    }
    Ok(())
}

#[test]
fn test_addresses_flag_beats_hostfile() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let hostfile = write_hostfile(&dir, &["from-file:1", "from-file:2"])?;
    let env = TestEnv::default().with("HOSTFILE_PATH", hostfile.display().to_string());

    let args = args(&[
        "examples.basic:flow",
        "--addresses",
        "from-flag:1;from-flag:2;from-flag:3",
        "--process-id",
        "2",
    ])?;
    let config = launcher::resolve(&args, &env)?;

    assert_eq!(config.process_id(), 2);
    assert_eq!(
        config.addresses_joined().as_deref(),
        Some("from-flag:1;from-flag:2;from-flag:3")
    );
    Ok(())
}

#[test]
fn test_no_sources_is_single_process() -> Result<()> {
    let config = launcher::resolve(&args(&["examples.basic:flow"])?, TestEnv::default())?;

    assert_eq!(config.process_id(), 0);
    assert_eq!(config.addresses(), None);
    assert!(config.is_single_process());
    assert_eq!(config.recovery(), None);
    Ok(())
}

#[test]
fn test_backup_interval_flags() -> Result<()> {
    let args_60 = args(&["examples/basic.py:flow", "--backup-interval", "60"])?;
    let config = launcher::resolve(&args_60, TestEnv::default())?;
    assert_eq!(config.backup_interval(), Some(Duration::from_secs(60)));
    assert_eq!(
        config.backup_policy(),
        BackupPolicy::Every(Duration::from_secs(60))
    );

    let args_zero = args(&[
        "examples/basic.py:flow",
        "--recovery-directory",
        "/fake/directory",
        "--snapshot-interval",
        "30",
        "--backup-interval",
        "0",
    ])?;
    let config = launcher::resolve(&args_zero, TestEnv::default())?;
    assert_eq!(config.backup_interval(), Some(Duration::ZERO));

    let recovery = config.recovery().expect("recovery directory was given");
    assert_eq!(recovery.backup, BackupPolicy::Disabled);
    assert_eq!(recovery.snapshot_interval, Duration::from_secs(30));
    Ok(())
}

#[test]
fn test_import_forms_agree() -> Result<()> {
    for spec in ["examples/basic.py:flow", "examples.basic:flow"] {
        let config = launcher::resolve(&args(&[spec])?, TestEnv::default())?;
        assert_eq!(config.import_module(), "examples.basic");
        assert_eq!(config.import_attribute(), "flow");
    }
    Ok(())
}

#[test]
fn test_errors_carry_raw_input() -> Result<()> {
    let err = launcher::resolve(&args(&["noseparator"])?, TestEnv::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidImportSpecifier { .. }));
    assert_eq!(err.raw_input(), "noseparator");

    let err = launcher::resolve(
        &args(&["examples.basic:flow", "--snapshot-interval", "-10"])?,
        TestEnv::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidDuration { .. }));
    assert_eq!(err.raw_input(), "-10");

    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("absent.txt").display().to_string();
    let env = TestEnv::default().with("HOSTFILE_PATH", missing.clone());
    let err = launcher::resolve(&args(&["examples.basic:flow"])?, &env).unwrap_err();
    assert!(matches!(err, Error::HostfileNotFound { .. }));
    assert_eq!(err.raw_input(), missing);

    let env = TestEnv::default()
        .with("POD_NAME", "wordcount-x")
        .with("STATEFULSET_NAME", "wordcount");
    let err = launcher::resolve(&args(&["examples.basic:flow"])?, &env).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedPodName { .. }));

    let err = launcher::resolve(
        &args(&["examples.basic:flow", "-p", "3", "-a", "a:1;b:2"])?,
        TestEnv::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::ProcessIdOutOfRange {
            process_id: 3,
            cluster_size: 2
        }
    ));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let args = args(&[
        "examples/basic.py:flow",
        "-p",
        "1",
        "-a",
        "a:1;b:2",
        "-w",
        "3",
        "-r",
        "/var/recovery",
    ])?;
    let config = launcher::resolve(&args, TestEnv::default())?;

    let mut out = Vec::new();
    launcher::write_config(&config, &mut out)?;
    let json: serde_json::Value = serde_json::from_slice(&out)?;

    assert_eq!(json["process_id"], 1);
    assert_eq!(json["addresses"], serde_json::json!(["a:1", "b:2"]));
    assert_eq!(json["workers_per_process"], 3);
    assert_eq!(json["recovery_directory"], "/var/recovery");
    assert_eq!(json["snapshot_interval"], serde_json::Value::Null);
    Ok(())
}
