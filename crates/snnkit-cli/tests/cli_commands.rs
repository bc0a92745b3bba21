use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// Temporary workspace with its own config file so user settings never leak in
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Result<Self, Box<dyn Error>> {
        let dir = tempdir()?;
        let figures = dir.path().join("figures");
        std::fs::write(
            dir.path().join("config.toml"),
            format!(
                "[plotting]\nfig_save_dir = {:?}\nformats = [\"svg\", \"png\"]\n",
                figures.to_string_lossy()
            ),
        )?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf, Box<dyn Error>> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    fn cmd(&self) -> Result<Command, Box<dyn Error>> {
        let mut cmd = Command::cargo_bin("snnkit")?;
        cmd.env_remove("RUST_LOG")
            .env_remove("SNNKIT_CONFIG")
            .arg("--config")
            .arg(self.path("config.toml"));
        Ok(cmd)
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn convert_to_matrix_counts() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("scenario.json", r#"{"0": [0.1, 0.5, 0.9]}"#)?;

    let output = ws
        .cmd()?
        .args(["convert", arg(&input), "--to", "matrix"])
        .args(["--bin-width", "0.5", "--t-min", "0", "--t-max", "1.0", "--mode", "count"])
        .output()?;
    assert!(output.status.success());

    let matrix: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(matrix["mode"], "count");
    assert_eq!(matrix["rows"], serde_json::json!([[1, 2]]));
    assert_eq!(matrix["bin_edges"], serde_json::json!([0.0, 0.5, 1.0]));
    Ok(())
}

#[test]
fn convert_pairs_to_raster_file() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("pairs.json", "[[2, 0.7], [0, 0.3], [2, 0.1]]")?;
    let out = ws.path("out/raster.json");

    ws.cmd()?
        .args(["convert", arg(&input), "--layout", "pairs", "--to", "raster"])
        .args(["-o", arg(&out)])
        .assert()
        .success();

    let raster: Vec<Vec<f64>> = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(raster, vec![vec![0.3], vec![], vec![0.1, 0.7]]);
    Ok(())
}

#[test]
fn convert_matrix_without_bin_width_fails() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("scenario.json", r#"{"0": [0.1]}"#)?;

    ws.cmd()?
        .args(["convert", arg(&input), "--to", "matrix"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command failed"));
    Ok(())
}

#[test]
fn invalid_spikes_are_reported() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("bad.json", r#"{"3": [-0.5]}"#)?;

    ws.cmd()?
        .args(["inspect", arg(&input)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("-0.5"));
    Ok(())
}

#[test]
fn inspect_detailed() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write(
        "cols.json",
        r#"{"indices": [1, 0, 1], "times": [2.0, 1.0, 4.0]}"#,
    )?;

    ws.cmd()?
        .args(["inspect", arg(&input), "--layout", "columns", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Channels: 2"))
        .stdout(predicate::str::contains("Spikes: 3"))
        .stdout(predicate::str::contains("Time range: 1 .. 4"))
        .stdout(predicate::str::contains("channel 1: 2 spike(s)"));
    Ok(())
}

#[test]
fn snapshot_roundtrip_json_and_bincode() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("trial.json", "[[0.1, 0.2], [], [3.0]]")?;

    for (format, file) in [("json", "trial.snap.json"), ("bincode", "trial.bin")] {
        let snap = ws.path(file);
        ws.cmd()?
            .args(["snapshot", "export", arg(&input), "--layout", "lists"])
            .args(["--bin-width", "1.0", "--format", format, "-o", arg(&snap)])
            .assert()
            .success();
        assert!(snap.exists(), "{} snapshot should be created", format);

        ws.cmd()?
            .args(["snapshot", "import", arg(&snap), "--format", format])
            .assert()
            .success()
            .stdout(predicate::str::contains("Label: trial"))
            .stdout(predicate::str::contains("Channels: 3"))
            .stdout(predicate::str::contains("Bin width: 1"));
    }
    Ok(())
}

#[test]
fn plot_raster_into_configured_dir() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("trial.json", "[[1.0, 5.0], [2.0], [3.5, 9.0]]")?;

    ws.cmd()?
        .args(["plot", "raster", arg(&input), "--layout", "lists"])
        .args(["--key", "in,in,out", "--time-shift", "1.0", "--scale-bar-ms", "2"])
        .assert()
        .success();

    assert!(ws.path("figures/trial_raster.svg").is_file());
    assert!(ws.path("figures/trial_raster.png").is_file());
    Ok(())
}

#[test]
fn plot_heatmap_svg_only() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("trial.json", "[[1.0, 5.0], [2.0]]")?;

    ws.cmd()?
        .args(["plot", "heatmap", arg(&input), "--layout", "lists"])
        .args(["--bin-width", "2", "--mode", "count", "--name", "heat", "--formats", "svg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("heat.svg"));

    assert!(ws.path("figures/heat.svg").is_file());
    assert!(!ws.path("figures/heat.png").exists());
    Ok(())
}

#[test]
fn plot_key_length_mismatch_fails() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("trial.json", "[[1.0], [2.0]]")?;

    ws.cmd()?
        .args(["plot", "raster", arg(&input), "--layout", "lists", "--key", "a,b,c"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn store_summarize_with_label_filter() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    ws.write("rec/control/a.json", "[[0.1, 0.2], [0.3]]")?;
    ws.write("rec/control/b.json", "[[0.1]]")?;
    ws.write("rec/stim/a.json", "[[0.5, 0.6, 0.7, 0.8]]")?;
    let dir = ws.path("rec");

    ws.cmd()?
        .args(["store", "summarize", arg(&dir), "--layout", "lists", "--by-label"])
        .assert()
        .success()
        .stdout(predicate::str::contains("control/a\tcontrol\t2\t3"))
        .stdout(predicate::str::contains("stim/a\tstim\t1\t4"))
        .stdout(predicate::str::contains("control\t2.000\t1.000\t2"));

    ws.cmd()?
        .args(["store", "summarize", arg(&dir), "--layout", "lists", "--label", "stim"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stim/a"))
        .stdout(predicate::str::contains("control/a").not());
    Ok(())
}

#[test]
fn config_get_and_init() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;

    ws.cmd()?
        .args(["config", "get", "plotting.formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("svg"));

    ws.cmd()?
        .args(["config", "get", "plotting.nope"])
        .assert()
        .failure();

    // the workspace config already exists
    ws.cmd()?.args(["config", "init"]).assert().failure();
    ws.cmd()?
        .args(["config", "init", "--force"])
        .assert()
        .success();

    ws.cmd()?
        .args(["config", "get", "plotting.fig_save_dir"])
        .assert()
        .success()
        .stdout(predicate::str::diff("figures\n"));
    Ok(())
}

#[test]
fn config_init_replaces_malformed_file() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    ws.write("config.toml", "[plotting\nfig_save_dir = ")?;

    ws.cmd()?
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    ws.cmd()?
        .args(["config", "init", "--force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring unreadable configuration"));

    ws.cmd()?
        .args(["config", "get", "plotting.fig_save_dir"])
        .assert()
        .success()
        .stdout(predicate::str::diff("figures\n"));
    Ok(())
}

#[test]
fn convert_rejects_unbounded_bin_count() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let input = ws.write("scenario.json", r#"{"0": [0.5]}"#)?;

    ws.cmd()?
        .args(["convert", arg(&input), "--to", "matrix", "--mode", "count"])
        .args(["--bin-width", "1e-300", "--t-min", "0", "--t-max", "1e10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command failed"));
    Ok(())
}
