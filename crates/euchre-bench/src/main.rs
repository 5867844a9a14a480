use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use euchre_bench::analytics::CallRateSurvey;
use euchre_bench::config::BatchConfig;
use euchre_bench::logging::init_logging;
use euchre_bench::report::{EvTable, TableRun, render_hand_scores, render_summary};
use euchre_bench::simulation::ForcedBatch;
use euchre_bench::trace::JsonlTraceSink;
use euchre_bot::BotParams;
use euchre_core::model::card::parse_cards;
use euchre_core::model::hand::ensure_distinct;
use euchre_core::model::suit::Suit;

/// Monte Carlo harness for the euchre bot.
#[derive(Debug, Parser)]
#[command(
    name = "euchre-bench",
    author,
    version,
    about = "Forced-decision EV batches and call-rate surveys for the euchre bot"
)]
struct Cli {
    /// Path to a YAML batch configuration; built-in defaults are used when omitted.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Force one bid for the controlled seat and measure its EV.
    ForcedEv(ForcedArgs),
    /// Run every forced bid for the controlled seat and rank them by EV.
    Table(TableArgs),
    /// Let every seat bid freely and report call, win and loner rates.
    CallRates(SurveyArgs),
    /// Print the evaluator breakdown for a hand.
    ScoreHand(ScoreArgs),
}

#[derive(Debug, Args)]
struct BatchOverrides {
    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of trials.
    #[arg(long, value_name = "COUNT")]
    trials: Option<usize>,

    /// Override the batch seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Dealer seat (north, east, south, west).
    #[arg(long, value_name = "SEAT")]
    dealer: Option<String>,

    /// Controlled seat (north, east, south, west).
    #[arg(long, value_name = "SEAT")]
    seat: Option<String>,

    /// Pin the controlled hand, e.g. "J of spades, K of spades, J of hearts, 10 of diamonds, 9 of diamonds".
    #[arg(long, value_name = "CARDS")]
    hand: Option<String>,

    /// Pin the up-card, e.g. "9 of clubs".
    #[arg(long, value_name = "CARD")]
    up_card: Option<String>,

    /// Force the controlled seat to go alone when its forced bid names trump.
    #[arg(long)]
    alone: bool,

    /// Card led to the first trick when its leader holds it.
    #[arg(long, value_name = "CARD")]
    lead_card: Option<String>,

    /// Write one JSON line per applied trial.
    #[arg(long)]
    trace: bool,

    /// Trace file path ({run_id} is substituted).
    #[arg(long, value_name = "FILE")]
    trace_path: Option<String>,

    /// Run trials on the current thread only.
    #[arg(long)]
    sequential: bool,
}

impl BatchOverrides {
    fn apply(&self, config: &mut BatchConfig) {
        if let Some(run_id) = &self.run_id {
            config.run_id = run_id.clone();
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(dealer) = &self.dealer {
            config.dealer = dealer.clone();
        }
        if let Some(seat) = &self.seat {
            config.controlled.seat = seat.clone();
        }
        if let Some(hand) = &self.hand {
            config.controlled.hand = Some(hand.clone());
        }
        if let Some(up_card) = &self.up_card {
            config.controlled.up_card = Some(up_card.clone());
        }
        if self.alone {
            config.controlled.going_alone = true;
        }
        if let Some(lead_card) = &self.lead_card {
            config.controlled.lead_card = Some(lead_card.clone());
        }
        if self.trace {
            config.trace.enabled = true;
        }
        if let Some(path) = &self.trace_path {
            config.trace.path = path.clone();
        }
        if self.sequential {
            config.parallel = false;
        }
    }
}

#[derive(Debug, Args)]
struct ForcedArgs {
    #[command(flatten)]
    overrides: BatchOverrides,

    /// Bidding round of the forced decision (1 or 2).
    #[arg(long, value_name = "ROUND")]
    round: Option<u8>,

    /// Forced action: pass, order_up, next, reverse1 or reverse2.
    #[arg(long, value_name = "ACTION")]
    action: Option<String>,

    /// Exit after validating the configuration (no trials are run).
    #[arg(long)]
    validate_only: bool,
}

#[derive(Debug, Args)]
struct TableArgs {
    #[command(flatten)]
    overrides: BatchOverrides,

    /// Only run the round-1 bids.
    #[arg(long)]
    no_round2: bool,
}

#[derive(Debug, Args)]
struct SurveyArgs {
    /// Number of deals (defaults to the configured trial count).
    #[arg(long, value_name = "COUNT")]
    deals: Option<usize>,

    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    #[arg(long, value_name = "SEAT")]
    dealer: Option<String>,

    /// Also write the report as Markdown.
    #[arg(long, value_name = "FILE")]
    markdown: Option<PathBuf>,

    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Comma-separated cards, e.g. "A of diamonds, J of spades".
    hand: String,

    /// Score one trump suit only.
    #[arg(long, value_name = "SUIT")]
    trump: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => BatchConfig::from_path(path)?,
        None => BatchConfig::default(),
    };

    match cli.command {
        Command::ForcedEv(args) => run_forced(&mut config, args),
        Command::Table(args) => run_table(&mut config, args),
        Command::CallRates(args) => run_survey(&mut config, args),
        Command::ScoreHand(args) => score_hand(args),
    }
}

fn run_forced(config: &mut BatchConfig, args: ForcedArgs) -> anyhow::Result<()> {
    args.overrides.apply(config);
    if let Some(round) = args.round {
        config.scenario.round = round;
    }
    if let Some(action) = args.action {
        config.scenario.action = action;
    }
    config.validate()?;

    let scenario = config.forced_scenario()?;
    println!(
        "Loaded batch '{}': {} trials, {} forced for {}",
        config.run_id,
        config.trials,
        scenario.label(),
        scenario.controlled
    );
    if args.validate_only {
        println!("Validation-only mode: batch execution skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &config.resolved_output_dir())?;
    let batch = ForcedBatch::new(scenario, config.trials, config.seed)
        .with_dealer(config.dealer()?)
        .with_parallel(config.parallel);

    let summary = match config.resolved_trace_path() {
        Some(path) => {
            let mut sink = JsonlTraceSink::append(&path, config.trace.flush_each_hand)
                .with_context(|| format!("opening trace file at {}", path.display()))?;
            let summary = batch.with_traces(true).run_with_sink(&mut sink)?;
            println!("Trace: {}", sink.path().display());
            summary
        }
        None => batch.run()?,
    };
    print!("{}", render_summary(&summary));
    Ok(())
}

fn run_table(config: &mut BatchConfig, args: TableArgs) -> anyhow::Result<()> {
    args.overrides.apply(config);
    if args.no_round2 {
        config.include_round2 = false;
    }
    config.validate()?;

    let _logging_guard = init_logging(&config.logging, &config.resolved_output_dir())?;
    let table = EvTable::run(
        &config.forced_scenario()?,
        TableRun {
            trials: config.trials,
            seed: config.seed,
            dealer: config.dealer()?,
            parallel: config.parallel,
            include_round2: config.include_round2,
        },
    )?;
    print!("{}", table.render());
    Ok(())
}

fn run_survey(config: &mut BatchConfig, args: SurveyArgs) -> anyhow::Result<()> {
    if let Some(deals) = args.deals {
        config.trials = deals;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(dealer) = args.dealer {
        config.dealer = dealer;
    }
    if args.sequential {
        config.parallel = false;
    }
    config.validate()?;

    let _logging_guard = init_logging(&config.logging, &config.resolved_output_dir())?;
    let report = CallRateSurvey::new(config.trials, config.seed)
        .with_dealer(config.dealer()?)
        .with_parallel(config.parallel)
        .run()?;
    print!("{}", report.render_markdown());
    if let Some(path) = args.markdown {
        report.write_markdown(&path)?;
        println!("\nMarkdown report: {}", path.display());
    }
    Ok(())
}

fn score_hand(args: ScoreArgs) -> anyhow::Result<()> {
    let cards = parse_cards(&args.hand)?;
    ensure_distinct(&cards)?;
    let suits = match args.trump {
        Some(text) => vec![text.parse::<Suit>()?],
        None => Suit::ALL.to_vec(),
    };
    print!("{}", render_hand_scores(&cards, &suits, &BotParams::default()));
    Ok(())
}
