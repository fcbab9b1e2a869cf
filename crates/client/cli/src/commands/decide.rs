//! Run one decision from a scenario file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use battle_ai::{ConfigLoader, Evaluation, Scenario, UnifiedDecisionEngine};
use battle_core::{ActionCandidate, AgentId, CombatPhase, SystemClock};
use clap::Parser;
use console::style;
use serde::Serialize;

/// Run one decision from a scenario file
#[derive(Parser)]
pub struct Decide {
    /// Scenario file (RON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Config file (RON); defaults apply otherwise
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Phase weights file (RON); omitted phases keep their defaults
    #[arg(short, long, value_name = "WEIGHTS")]
    weights: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Phase, winner and ranked candidates
    Summary,
    /// Full JSON report
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: &'a str,
    agent: AgentId,
    phase: CombatPhase,
    selected: Option<&'a ActionCandidate>,
    candidates: &'a [ActionCandidate],
}

impl Decide {
    pub fn execute(self) -> Result<()> {
        let config = super::load_config(self.config.as_deref())?;
        let scenario = Scenario::load_from_file(&self.scenario)
            .with_context(|| format!("Failed to load scenario: {}", self.scenario.display()))?;

        let mut engine = UnifiedDecisionEngine::new(config, Arc::new(SystemClock::new()));
        if let Some(path) = &self.weights {
            let weights = ConfigLoader::load_weights_from_file(path)
                .with_context(|| format!("Failed to load weights: {}", path.display()))?;
            engine = engine.with_weights(weights);
        }
        let env = scenario.env();
        let mut situation = scenario.resolved_situation();
        let evaluation = engine
            .evaluate(&mut situation, &env)
            .with_context(|| format!("Decision failed for scenario '{}'", scenario.name))?;

        match self.format {
            OutputFormat::Summary => print_summary(&scenario, &evaluation),
            OutputFormat::Json => print_json(&scenario, &evaluation)?,
        }

        Ok(())
    }
}

fn print_summary(scenario: &Scenario, evaluation: &Evaluation) {
    println!("{} {}", style("Scenario:").bold().cyan(), scenario.name);
    println!("{} {}", style("Agent:").bold().cyan(), scenario.agent());
    println!("{} {}", style("Phase:").bold().cyan(), evaluation.phase);
    println!();

    if let Some(selected) = evaluation.selection() {
        println!("{}", style("Selected:").bold().green());
        println!("  {}", selected);
        println!();
    }

    let mut ranked: Vec<(usize, &ActionCandidate)> =
        evaluation.candidates.iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));

    println!(
        "{}",
        style(format!("Candidates ({}):", ranked.len())).bold().yellow()
    );
    for (index, candidate) in ranked {
        let marker = if index == evaluation.selected { "*" } else { " " };
        println!("  {} {:>6.3}  {}", marker, candidate.score, candidate);
    }
}

fn print_json(scenario: &Scenario, evaluation: &Evaluation) -> Result<()> {
    let report = Report {
        scenario: &scenario.name,
        agent: scenario.agent(),
        phase: evaluation.phase,
        selected: evaluation.selection(),
        candidates: &evaluation.candidates,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
