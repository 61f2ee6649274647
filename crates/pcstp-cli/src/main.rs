use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pcstp::options::{BranchType, NodeSelect};
use pcstp::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod format;
mod memory;

use format::Format;

#[derive(Parser)]
#[command(name = "pcstp")]
#[command(about = "Exact solver for the directed Prize-Collecting Steiner Tree Problem")]
struct Cli {
    /// Instance file (`.pcs` line format or `.json`).
    input: PathBuf,

    /// Override format autodetection from the input's extension.
    #[arg(long, value_enum)]
    format: Option<CliFormat>,

    /// Write the solution/stats JSON here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// RNG seed for dual-ascent guide shuffling and heuristic perturbation.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Wall-clock budget for the whole solve, in seconds.
    #[arg(long, default_value_t = 300.0)]
    time_limit: f64,
    /// Maximum number of B&B iterations.
    #[arg(long)]
    node_limit: Option<usize>,
    /// Maximum accepted incumbent improvements before stopping.
    #[arg(long)]
    sol_limit: Option<usize>,
    /// Resident-memory budget in MB.
    #[arg(long)]
    mem_limit_mb: Option<u64>,
    /// External upper bound to seed the search with.
    #[arg(long)]
    cutup: Option<f64>,

    #[arg(long, value_enum, default_value = "best-bound")]
    node_select: CliNodeSelect,
    #[arg(long, value_enum, default_value = "prio-deg-deg-s")]
    branch_type: CliBranchType,

    #[arg(long, default_value_t = 3)]
    da_iterations: usize,
    #[arg(long, default_value_t = 1e-6)]
    abs_gap: f64,

    #[arg(long)]
    no_d1: bool,
    #[arg(long)]
    no_d2: bool,
    #[arg(long)]
    no_ma: bool,
    #[arg(long)]
    no_ms: bool,
    #[arg(long)]
    no_ss: bool,
    #[arg(long)]
    no_lc: bool,
    #[arg(long)]
    no_nr: bool,
    #[arg(long)]
    no_big_m: bool,
    #[arg(long)]
    no_semi_big_m: bool,
    #[arg(long)]
    no_heurbb: bool,
    #[arg(long)]
    no_initprep: bool,

    /// Increase logging verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliFormat {
    Pcs,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliNodeSelect {
    WorstBound,
    Dfs,
    BestBound,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliBranchType {
    PrioDegDegS,
    DegDegS,
    Deg,
    DegS,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_env_filter(EnvFilter::new(format!("pcstp={level}")))
        .init();

    let format = match cli.format {
        Some(CliFormat::Pcs) => Format::Pcs,
        Some(CliFormat::Json) => Format::Json,
        None => Format::detect(&cli.input)?,
    };
    let text = std::fs::read_to_string(&cli.input).with_context(|| format!("reading {}", cli.input.display()))?;
    let instance = format.parse(&text).with_context(|| format!("parsing {}", cli.input.display()))?;

    let opts = Options {
        seed: cli.seed,
        nodeselect: match cli.node_select {
            CliNodeSelect::WorstBound => NodeSelect::WorstBound,
            CliNodeSelect::Dfs => NodeSelect::Dfs,
            CliNodeSelect::BestBound => NodeSelect::BestBound,
        },
        branchtype: match cli.branch_type {
            CliBranchType::PrioDegDegS => BranchType::PrioDegDegS,
            CliBranchType::DegDegS => BranchType::DegDegS,
            CliBranchType::Deg => BranchType::Deg,
            CliBranchType::DegS => BranchType::DegS,
        },
        daiterations: cli.da_iterations,
        absgap: cli.abs_gap,
        d1: !cli.no_d1,
        d2: !cli.no_d2,
        ma: !cli.no_ma,
        ms: !cli.no_ms,
        ss: !cli.no_ss,
        lc: !cli.no_lc,
        nr: !cli.no_nr,
        big_m: !cli.no_big_m,
        semi_big_m: !cli.no_semi_big_m && !cli.no_big_m,
        heurbb: !cli.no_heurbb,
        initprep: !cli.no_initprep,
        ..Options::default()
    };

    let limits = Limits {
        sol_lim: cli.sol_limit.unwrap_or(usize::MAX),
        node_lim: cli.node_limit.unwrap_or(usize::MAX),
        time_lim: Duration::from_secs_f64(cli.time_limit.max(0.0)),
        cutup: cli.cutup,
        memlimit: cli.mem_limit_mb.unwrap_or(u64::MAX),
    };

    let mut probe = memory::ProcStatmProbe::new();
    let report = BbTree::new(opts).solve(instance, limits, &mut probe);

    let rendered = render_report(&report);
    match cli.output {
        Some(path) => std::fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct ReportJson<'a> {
    objective: Option<f64>,
    root: Option<usize>,
    nodes: Option<&'a [bool]>,
    arcs: Option<&'a [bool]>,
    cause: pcstp::stats::TerminationCause,
    bestlb: f64,
    n_iter: usize,
    n_roots: usize,
    n_roots_processed: usize,
    n_improvements: usize,
}

fn render_report(report: &pcstp::bb::SolveReport) -> String {
    let json = ReportJson {
        objective: report.solution.as_ref().map(|s| s.obj),
        root: report.solution.as_ref().and_then(|s| s.r),
        nodes: report.solution.as_ref().map(|s| s.nodes.as_slice()),
        arcs: report.solution.as_ref().map(|s| s.arcs.as_slice()),
        cause: report.stats.cause,
        bestlb: report.stats.bestlb,
        n_iter: report.stats.n_iter,
        n_roots: report.stats.n_roots,
        n_roots_processed: report.stats.n_roots_processed,
        n_improvements: report.stats.n_improvements,
    };
    serde_json::to_string_pretty(&json).expect("report JSON is always serializable")
}
