use std::fs;

use euchre_bench::config::BatchConfig;
use euchre_bench::simulation::{ForcedBatch, ForcedScenario};
use euchre_bench::trace::{JsonlTraceSink, NO_TRUMP_NOTE, read_traces};
use euchre_core::model::call::{CallAction, CallRound};
use tempfile::tempdir;

fn load_config(yaml_extra: &str) -> BatchConfig {
    let yaml = format!(
        r#"
run_id: "smoke"
trials: 10000
seed: 4242
controlled:
  seat: "north"
  hand: "J of spades, K of spades, J of hearts, 10 of diamonds, 9 of diamonds"
  up_card: "9 of clubs"
scenario:
  round: 1
  action: "order_up"
{yaml_extra}
"#
    );

    let mut cfg: BatchConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn ten_thousand_trial_batch_is_reproducible() {
    let config = load_config("");
    let scenario = config.forced_scenario().expect("scenario");

    let first = ForcedBatch::new(scenario.clone(), config.trials, config.seed)
        .with_parallel(true)
        .run()
        .expect("batch runs");
    let second = ForcedBatch::new(scenario.clone(), config.trials, config.seed)
        .with_parallel(true)
        .run()
        .expect("batch runs");
    let sequential = ForcedBatch::new(scenario, config.trials, config.seed)
        .with_parallel(false)
        .run()
        .expect("batch runs");

    assert_eq!(first.requested, 10_000);
    // North bids first behind a west dealer, so a round-1 bid is always reached.
    assert_eq!(first.applied, 10_000);
    assert_eq!((first.ev, first.applied), (second.ev, second.applied));
    assert_eq!(first, sequential);
    assert!(first.ev >= -4.0 && first.ev <= 4.0);
}

#[test]
fn every_forced_bid_is_reproducible_for_the_pinned_hand() {
    let config = load_config("");
    let base = config.forced_scenario().expect("scenario");
    for round in CallRound::BOTH {
        for &action in CallAction::for_round(round) {
            let scenario = base.with_action(round, action);
            let a = ForcedBatch::new(scenario.clone(), 300, 77).run().expect("runs");
            let b = ForcedBatch::new(scenario, 300, 77).run().expect("runs");
            assert_eq!(a, b, "{round} {action}");
            assert!(a.applied <= a.requested);
        }
    }
}

#[test]
fn jsonl_trace_has_one_line_per_applied_trial() {
    let dir = tempdir().expect("temp dir");
    let trace_path = dir.path().join("nested").join("trace.jsonl");
    let config = load_config(&format!(
        "trace:\n  enabled: true\n  path: \"{}\"\n",
        trace_path.display()
    ));
    assert_eq!(config.resolved_trace_path(), Some(trace_path.clone()));

    let scenario = ForcedScenario::new(
        euchre_core::model::player::PlayerPosition::West,
        CallRound::Two,
        CallAction::Pass,
    );
    let mut sink = JsonlTraceSink::append(&trace_path, true).expect("sink opens");
    let summary = ForcedBatch::new(scenario, 400, config.seed)
        .with_traces(true)
        .with_parallel(true)
        .run_with_sink(&mut sink)
        .expect("batch runs");
    drop(sink);

    let traces = read_traces(&trace_path).expect("trace decodes");
    assert_eq!(traces.len(), summary.applied);
    assert!(traces.windows(2).all(|pair| pair[0].sim_idx < pair[1].sim_idx));
    // The dealer is the last seat to bid, so a forced round-2 pass never leaves a call.
    assert!(
        traces
            .iter()
            .all(|trace| trace.note.as_deref() == Some(NO_TRUMP_NOTE) && trace.net_ev == 0)
    );

    let raw = fs::read_to_string(&trace_path).expect("trace readable");
    assert_eq!(raw.lines().count(), summary.applied);
}

#[test]
fn traces_record_full_rounds() {
    let dir = tempdir().expect("temp dir");
    let trace_path = dir.path().join("rounds.jsonl");
    let config = load_config("");
    let mut scenario = config.forced_scenario().expect("scenario");
    scenario.lead_card = Some("9 of diamonds".parse().expect("card"));

    let mut sink = JsonlTraceSink::append(&trace_path, false).expect("sink opens");
    let summary = ForcedBatch::new(scenario, 25, 9)
        .with_traces(true)
        .run_with_sink(&mut sink)
        .expect("batch runs");
    drop(sink);

    let traces = read_traces(&trace_path).expect("trace decodes");
    assert_eq!(traces.len(), summary.applied);
    for trace in &traces {
        assert_eq!(trace.up_card.to_string(), "9 of clubs");
        assert_eq!(trace.tricks.len(), 5);
        let tally = trace.final_tally.expect("final tally");
        assert_eq!(tally.team1_tricks + tally.team2_tricks, 5);
        assert_eq!(
            i32::from(tally.team1_points) - i32::from(tally.team2_points),
            trace.net_ev
        );
        // North leads trick one and holds the pinned lead card.
        let opening = trace.tricks[0].record.plays[0];
        assert_eq!(opening.card.to_string(), "9 of diamonds");
    }
}
