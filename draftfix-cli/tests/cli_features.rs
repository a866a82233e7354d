//! Cucumber scenarios for the offline commands, run against the built `draftfix` binary.

use assert_cmd::Command;
use camino::Utf8PathBuf;
use cucumber::{World, given, then, when};
use fs_err as fs;
use tempfile::TempDir;

#[derive(Debug, Default, World)]
pub struct CliWorld {
    temp: Option<TempDir>,
    draft: Option<Utf8PathBuf>,
    exit_code: Option<i32>,
    stdout: String,
}

impl CliWorld {
    fn write_draft(&mut self, content: &str) {
        let td = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8 tempdir");
        let draft = root.join("draft.txt");
        fs::write(&draft, content).expect("write draft");
        self.temp = Some(td);
        self.draft = Some(draft);
    }

    fn draft(&self) -> Utf8PathBuf {
        self.draft.clone().expect("draft written")
    }

    fn run(&mut self, args: &[&str]) {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_draftfix"));
        if let Some(td) = &self.temp {
            cmd.current_dir(td.path());
        }
        let output = cmd
            .env_remove("ANTHROPIC_API_KEY")
            .args(args)
            .output()
            .expect("run draftfix");
        self.exit_code = output.status.code();
        self.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    }
}

#[given(expr = "a draft file containing {string}")]
async fn draft_file(world: &mut CliWorld, content: String) {
    world.write_draft(&content);
}

#[given(expr = "a draft file with {int} characters")]
async fn draft_file_sized(world: &mut CliWorld, len: usize) {
    world.write_draft(&"a".repeat(len));
}

#[when("I run draftfix check on the draft")]
async fn run_check(world: &mut CliWorld) {
    let draft = world.draft();
    world.run(&["check", draft.as_str()]);
}

#[when(expr = "I run draftfix check on the draft for platform {string}")]
async fn run_check_platform(world: &mut CliWorld, platform: String) {
    let draft = world.draft();
    world.run(&["check", draft.as_str(), "--platform", &platform]);
}

#[when("I run draftfix list-rules as JSON")]
async fn run_list_rules(world: &mut CliWorld) {
    world.run(&["list-rules", "--format", "json"]);
}

#[then(expr = "the exit code is {int}")]
async fn exit_code_is(world: &mut CliWorld, expected: i32) {
    assert_eq!(world.exit_code, Some(expected), "stdout:\n{}", world.stdout);
}

#[then(expr = "stdout contains {string}")]
async fn stdout_contains(world: &mut CliWorld, needle: String) {
    assert!(world.stdout.contains(&needle), "stdout:\n{}", world.stdout);
}

#[then(expr = "the listed rule ids are {string}")]
async fn listed_rule_ids(world: &mut CliWorld, expected: String) {
    let rules: Vec<serde_json::Value> =
        serde_json::from_str(&world.stdout).expect("list-rules JSON");
    let ids: Vec<&str> = rules.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids.join(", "), expected);
}

#[tokio::main]
async fn main() {
    let features_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("features");
    CliWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit(features_path)
        .await;
}
