use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bench() -> Command {
    Command::cargo_bin("euchre-bench").expect("binary builds")
}

#[test]
fn score_hand_prints_every_suit() {
    bench()
        .args([
            "score-hand",
            "A of diamonds, A of hearts, J of spades, J of diamonds, J of hearts",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scoring hand:"))
        .stdout(predicate::str::contains("clubs:"))
        .stdout(predicate::str::contains("Total Score").count(4));
}

#[test]
fn score_hand_rejects_duplicates() {
    bench()
        .args(["score-hand", "9 of clubs, 9 of clubs", "--trump", "clubs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than once"));
}

#[test]
fn forced_ev_reports_summary_and_trace() {
    let dir = tempdir().expect("temp dir");
    let trace = dir.path().join("trace.jsonl");
    bench()
        .args([
            "forced-ev",
            "--trials",
            "200",
            "--seat",
            "north",
            "--hand",
            "J of spades, K of spades, J of hearts, 10 of diamonds, 9 of diamonds",
            "--up-card",
            "9 of clubs",
            "--round",
            "1",
            "--action",
            "order_up",
            "--trace",
            "--trace-path",
        ])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("R1 order_up"))
        .stdout(predicate::str::contains("applied: 200/200"));

    let lines = std::fs::read_to_string(&trace).expect("trace written");
    assert_eq!(lines.lines().count(), 200);
}

#[test]
fn forced_ev_rejects_unknown_action() {
    bench()
        .args(["forced-ev", "--action", "shoot", "--validate-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scenario.action"));
}

#[test]
fn table_ranks_round_one_bids() {
    bench()
        .args([
            "table",
            "--trials",
            "100",
            "--up-card",
            "9 of clubs",
            "--no-round2",
            "--sequential",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forced EV table"))
        .stdout(predicate::str::contains("R1 pass"))
        .stdout(predicate::str::contains("R1 order_up"))
        .stdout(predicate::str::contains("R2 next").not());
}

#[test]
fn call_rates_survey_prints_tables() {
    let dir = tempdir().expect("temp dir");
    let markdown = dir.path().join("survey.md");
    bench()
        .args(["call-rates", "--deals", "100", "--seed", "3", "--markdown"])
        .arg(&markdown)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Call-Rate Survey"))
        .stdout(predicate::str::contains("| West |"));
    assert!(markdown.exists());
}

#[test]
fn config_file_drives_the_batch() {
    let dir = tempdir().expect("temp dir");
    let config = dir.path().join("batch.yaml");
    std::fs::write(
        &config,
        "run_id: \"cfg\"\ntrials: 50\nparallel: false\ncontrolled:\n  seat: \"east\"\nscenario:\n  round: 2\n  action: \"next\"\n",
    )
    .expect("config written");
    bench()
        .arg("--config")
        .arg(&config)
        .args(["forced-ev", "--validate-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded batch 'cfg': 50 trials, R2 next forced for East"))
        .stdout(predicate::str::contains("Validation-only mode"));
}
