use std::fs;
use std::process::Command;

use anaquery::HistogramExport;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const BOOKING: &str = r#"
[[hist]]
name = "pt"
x = { column = "pt", bins = 4, min = 0.0, max = 40.0 }
weight = "w"

[[hist]]
name = "jet_eta_pt"
x = { column = "eta", edges = [-2.0, 0.0, 2.0] }
y = { column = "pt", bins = 2, min = 0.0, max = 40.0 }
"#;

const EVENTS: &str = "
# pt   eta         w
pt     eta         w
5.0    [-1.0,1.0]  2.0
15.0   []          1.0
35.0   [0.5]       0.5
50.0   [3.0,-1.5]  1.0
";

fn fillhist(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fillhist"))
        .args(args)
        .output()
        .expect("fillhist did not start")
}

#[test]
fn writes_json_exports() {
    let dir = tempdir().unwrap();
    let booking = dir.path().join("booking.toml");
    let events  = dir.path().join("events.txt");
    let out     = dir.path().join("out/histograms.json");
    fs::write(&booking, BOOKING).unwrap();
    fs::write(&events,  EVENTS ).unwrap();

    let output = fillhist(&[
        booking.to_str().unwrap(),
        events.to_str().unwrap(),
        "--out", out.to_str().unwrap(),
        "--partitions", "3",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let exports: Vec<HistogramExport> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exports.len(), 2);

    let pt = &exports[0];
    assert_eq!(pt.name, "pt");
    // underflow, 4 bins, overflow
    assert_eq!(pt.sumw,    vec![0.0, 2.0, 1.0, 0.0, 0.5, 1.0]);
    assert_eq!(pt.entries, vec![0,   1,   1,   0,   1,   1  ]);

    let eta_pt = &exports[1];
    assert_eq!(eta_pt.name, "jet_eta_pt");
    assert_eq!(eta_pt.entries.iter().sum::<u64>(), 5);
}

#[test]
fn summary_goes_to_stdout() {
    let dir = tempdir().unwrap();
    let booking = dir.path().join("booking.toml");
    let events  = dir.path().join("events.txt");
    fs::write(&booking, BOOKING).unwrap();
    fs::write(&events,  EVENTS ).unwrap();

    let output = fillhist(&[booking.to_str().unwrap(), events.to_str().unwrap(), "--summary"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("pt"));
    assert!(stdout.contains("jet_eta_pt"));
}

#[test]
fn missing_column_fails() {
    let dir = tempdir().unwrap();
    let booking = dir.path().join("booking.toml");
    let events  = dir.path().join("events.txt");
    fs::write(&booking, BOOKING).unwrap();
    fs::write(&events,  "pt w\n1.0 1.0\n").unwrap();

    let output = fillhist(&[booking.to_str().unwrap(), events.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("histogram 'jet_eta_pt': no column named 'eta'"));
}

#[test]
fn missing_weight_column_names_the_histogram() {
    let dir = tempdir().unwrap();
    let booking = dir.path().join("booking.toml");
    let events  = dir.path().join("events.txt");
    fs::write(&booking, BOOKING).unwrap();
    fs::write(&events,  "pt eta\n1.0 [0.5]\n").unwrap();

    let output = fillhist(&[booking.to_str().unwrap(), events.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("histogram 'pt': no column named 'w'"));
}

#[test]
fn degenerate_binning_is_rejected_before_filling() {
    let dir = tempdir().unwrap();
    let booking = dir.path().join("booking.toml");
    let events  = dir.path().join("events.txt");
    fs::write(&booking, r#"
        [[hist]]
        name = "wide"
        x = { column = "pt", bins = 4, min = -1e308, max = 1e308 }
    "#).unwrap();
    fs::write(&events, EVENTS).unwrap();

    let output = fillhist(&[booking.to_str().unwrap(), events.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Binning"));
}
