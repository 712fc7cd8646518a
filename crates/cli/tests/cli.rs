// Binary-level tests for `tariffs`. Every run is --offline and points at a
// temp config so the developer's own config never leaks in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

const NO_DOCUMENT: &str = "[document]\nenabled = false\n";

struct Env {
    dir: tempfile::TempDir,
    config: PathBuf,
}

impl Env {
    fn new(config_toml: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("tariffscope.toml");
        fs::write(&config, config_toml).unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        tariffs(&self.config, args)
    }
}

fn tariffs(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tariffs"))
        .arg("--offline")
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("TARIFFSCOPE_DOCUMENT")
        .env_remove("TARIFFSCOPE_LIVE_API")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tariffs")
}

fn stdout_json(output: &Output) -> Value {
    let text = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {text}"))
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ── resolve ──

#[test]
fn resolve_json_single_country() {
    let env = Env::new(NO_DOCUMENT);
    let out = env.run(&["resolve", "china", "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let v = stdout_json(&out);
    assert_eq!(v["country_name"], "China");
    assert_eq!(v["confidence"], "Medium");
    assert!((v["average_tariff_rate"].as_f64().unwrap() - 40.0).abs() < 1e-9);
    assert!(v["data_source"].as_str().unwrap().starts_with("Verified Tracker"));
    assert!(v["last_updated"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn resolve_json_several_countries_is_an_array() {
    let env = Env::new(NO_DOCUMENT);
    let out = env.run(&["resolve", "Japan", "Atlantis", "--json"]);
    assert!(out.status.success());

    let v = stdout_json(&out);
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["country_name"], "Atlantis");
    assert_eq!(items[1]["data_source"], "No Data");
    assert_eq!(items[1]["average_tariff_rate"], 0.0);
}

#[test]
fn resolve_human_output() {
    let env = Env::new("[document]\nenabled = false\n[sources]\nverified_tracker = false\n");
    let out = env.run(&["resolve", "China", "--detail"]);
    assert!(out.status.success());

    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.starts_with("China\n"));
    assert!(text.contains("rate:        31.00%"));
    assert!(text.contains("confidence:  Low"));
    assert!(text.contains("Steel and Aluminum"));
    assert!(text.contains("Under Investigation"));
}

#[test]
fn sector_and_hts_are_mutually_exclusive() {
    let env = Env::new(NO_DOCUMENT);
    let out = env.run(&["resolve", "China", "--sector", "Steel", "--hts", "7206"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn document_flag_adds_the_document_tier() {
    let env = Env::new(NO_DOCUMENT);
    let annex = env.path("annex.csv");
    fs::write(&annex, "Country,Sector,Addon,Authority\nJapan,Autos,15%,EO 14326 Annex I\n").unwrap();

    let out = env.run(&["--document", annex.to_str().unwrap(), "resolve", "Japan", "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let v = stdout_json(&out);
    assert_eq!(v["confidence"], "High");
    assert_eq!(v["affected_sectors"], serde_json::json!(["Autos"]));
    assert_eq!(v["data_source"], "Executive Order Annex (EO 14326 Annex I)");
}

#[test]
fn configured_reprieve_zeroes_the_rate() {
    let env = Env::new("[document]\nenabled = false\n[[reprieves]]\ncountry = \"Vietnam\"\nnote = \"Talks\"\n");
    let v = stdout_json(&env.run(&["resolve", "Vietnam", "--json"]));
    assert_eq!(v["average_tariff_rate"], 0.0);
    assert_eq!(v["affected_sectors"], serde_json::json!([]));
}

// ── verify ──

#[test]
fn verify_default_countries_pass() {
    let env = Env::new(NO_DOCUMENT);
    let out = env.run(&["verify"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let text = String::from_utf8_lossy(&out.stdout);
    assert_eq!(text.lines().count(), 8);
    assert!(text.lines().all(|l| l.starts_with("ok ")));
    assert!(stderr(&out).contains("verified 8 countries"));
}

#[test]
fn verify_fails_with_60_on_no_data() {
    let env = Env::new(NO_DOCUMENT);
    let out = env.run(&["verify", "China", "Atlantis", "--json"]);
    assert_eq!(out.status.code(), Some(60));

    let rows = stdout_json(&out);
    assert_eq!(rows[0]["ok"], true);
    assert_eq!(rows[1]["ok"], false);
    assert!(stderr(&out).contains("1 of 2 countries have no data: Atlantis"));
}

// ── sources / countries / rate ──

#[test]
fn sources_lists_the_chain_in_priority_order() {
    let env = Env::new(
        "[live_api]\nenabled = true\n[[live_api.endpoints]]\nname = \"USITC\"\nurl = \"https://example.gov/{country}\"\n",
    );
    let out = env.run(&["--document", env.path("annex.xlsx").to_str().unwrap(), "sources", "--json"]);
    assert!(out.status.success(), "{}", stderr(&out));

    let tiers: Vec<String> = stdout_json(&out)
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["tier"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(tiers, vec!["structured_document", "verified_tracker", "static_fallback"]);
}

#[test]
fn countries_are_listed() {
    let env = Env::new(NO_DOCUMENT);
    let list = stdout_json(&env.run(&["countries", "--json"]));
    let names: Vec<&str> = list.as_array().unwrap().iter().filter_map(Value::as_str).collect();
    assert!(names.contains(&"Germany"));
    assert!(names.contains(&"Hong Kong"));
}

#[test]
fn rate_normalizes_raw_values() {
    let env = Env::new(NO_DOCUMENT);
    let rate = |raw: &str| String::from_utf8_lossy(&env.run(&["rate", raw]).stdout).trim().to_string();
    assert_eq!(rate("25%"), "25");
    assert_eq!(rate("0.15"), "15");
    assert_eq!(rate("TBD"), "0");

    assert_eq!(rate("1,000%"), "1000");

    for bad in ["see annex", "-5%"] {
        let out = env.run(&["rate", bad]);
        assert_eq!(out.status.code(), Some(2), "{bad}");
        assert!(stderr(&out).contains("hint:"));
    }
}

// ── config ──

#[test]
fn bad_config_exits_3() {
    for ttl in ["-1", "3000000000"] {
        let env = Env::new(&format!("[cache]\nttl_hours = {ttl}\n"));
        let out = env.run(&["resolve", "China"]);
        assert_eq!(out.status.code(), Some(3), "ttl_hours = {ttl}");
        assert!(stderr(&out).contains("ttl_hours"));
    }
}

#[test]
fn missing_explicit_config_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let out = tariffs(&dir.path().join("nope.toml"), &["sources"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn long_version_reports_build_stamp() {
    let out = Command::new(env!("CARGO_BIN_EXE_tariffs")).arg("--version").output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains(env!("CARGO_PKG_VERSION")));
    assert!(text.contains("build:   "));
    assert!(text.contains("target:  "));
}
