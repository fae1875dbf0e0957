use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use maxmatch::api::*;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "maxmatch")]
#[command(about = "Maximum-cardinality matching runner")]
struct Cmd {
    /// Input graph file: "n m" header plus edge pairs, or "L R m" for
    /// the bipartite engine.
    input: PathBuf,

    /// Engine to run.
    #[arg(long, value_enum, default_value = "blossom-forest")]
    engine: Engine,

    /// Naive greedy warm start (first exposed neighbor).
    #[arg(long, conflicts_with = "greedy_md")]
    greedy: bool,

    /// Minimum-degree greedy warm start.
    #[arg(long)]
    greedy_md: bool,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    BlossomSimple,
    BlossomForest,
    Gabow,
    GabowScaling,
    HopcroftKarp,
    MicaliVazirani,
}

impl Engine {
    fn label(self) -> &'static str {
        match self {
            Engine::BlossomSimple => "blossom-simple",
            Engine::BlossomForest => "blossom-forest",
            Engine::Gabow => "gabow",
            Engine::GabowScaling => "gabow-scaling",
            Engine::HopcroftKarp => "hopcroft-karp",
            Engine::MicaliVazirani => "micali-vazirani",
        }
    }

    fn supports_warmstart(self) -> bool {
        !matches!(self, Engine::BlossomSimple | Engine::BlossomForest)
    }
}

struct Outcome {
    matching: Matching,
    report: ValidationReport,
    seeded: Option<usize>,
    elapsed_ms: u128,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();

    let warmstart = if cmd.greedy {
        Warmstart::Naive
    } else if cmd.greedy_md {
        Warmstart::MinDegree
    } else {
        Warmstart::Off
    };
    if warmstart != Warmstart::Off && !cmd.engine.supports_warmstart() {
        bail!(
            "engine {} does not support a greedy warm start",
            cmd.engine.label()
        );
    }

    println!("Maximum-cardinality matching - {}", cmd.engine.label());
    println!("================================================\n");

    let outcome = if cmd.engine == Engine::HopcroftKarp {
        run_bipartite(&cmd.input, warmstart)?
    } else {
        run_general(&cmd.input, cmd.engine, warmstart)?
    };

    print_report(&outcome);
    if let Some(out) = &cmd.out {
        write_summary(out, &cmd, &outcome)?;
    }
    Ok(())
}

fn run_general(input: &Path, engine: Engine, warmstart: Warmstart) -> Result<Outcome> {
    let parsed = load_general(input)?;
    println!("Graph: {} vertices, {} edges", parsed.n, parsed.edges.len());
    tracing::info!(engine = engine.label(), n = parsed.n, "run");

    let start = Instant::now();
    let g = Graph::from_edges(parsed.n, &parsed.edges);
    let (matching, seeded) = match engine {
        Engine::BlossomSimple => (BlossomSimple::new(&g).maximum_matching(), None),
        Engine::BlossomForest => (BlossomForest::new(&g).maximum_matching(), None),
        Engine::Gabow => {
            let mut e = GabowSimple::new(&g);
            let m = e.maximum_matching(warmstart);
            (m, seeded_if(warmstart, e.seeded()))
        }
        Engine::GabowScaling => {
            let mut e = GabowScaling::new(&g);
            let m = e.maximum_matching(warmstart);
            (m, seeded_if(warmstart, e.seeded()))
        }
        Engine::MicaliVazirani => {
            let mut e = MicaliVazirani::new(&g);
            let m = e.maximum_matching(warmstart);
            (m, seeded_if(warmstart, e.seeded()))
        }
        Engine::HopcroftKarp => unreachable!("bipartite path handled by the caller"),
    };
    let elapsed_ms = start.elapsed().as_millis();

    let report = validate(&g, &matching);
    Ok(Outcome {
        matching,
        report,
        seeded,
        elapsed_ms,
    })
}

fn run_bipartite(input: &Path, warmstart: Warmstart) -> Result<Outcome> {
    let parsed = load_bipartite(input)?;
    println!(
        "Graph: {} left, {} right, {} edges",
        parsed.left,
        parsed.right,
        parsed.edges.len()
    );
    tracing::info!(l = parsed.left, r = parsed.right, "run hopcroft-karp");

    let bws = match warmstart {
        Warmstart::Off => BipartiteWarmstart::Off,
        Warmstart::Naive => BipartiteWarmstart::Naive,
        Warmstart::MinDegree => BipartiteWarmstart::MinDegree,
    };

    let start = Instant::now();
    let g = BipartiteGraph::from_edges(parsed.left, parsed.right, &parsed.edges);
    let mut engine = HopcroftKarp::new(&g);
    let matching = engine.maximum_matching(bws);
    let elapsed_ms = start.elapsed().as_millis();

    let seeded = if bws == BipartiteWarmstart::Off {
        None
    } else {
        Some(engine.seeded())
    };
    let report = validate_bipartite(&g, &matching);
    Ok(Outcome {
        matching,
        report,
        seeded,
        elapsed_ms,
    })
}

fn seeded_if(warmstart: Warmstart, seeded: usize) -> Option<usize> {
    if warmstart == Warmstart::Off {
        None
    } else {
        Some(seeded)
    }
}

fn print_report(outcome: &Outcome) {
    for line in &outcome.report.errors {
        eprintln!("{line}");
    }

    println!("\n=== Validation Report ===");
    println!("Matching size: {}", outcome.report.size);
    match outcome.report.matched_right {
        Some(right) => println!(
            "Matched vertices: {} left, {} right",
            outcome.report.matched, right
        ),
        None => println!("Matched vertices: {}", outcome.report.matched),
    }
    println!(
        "{}",
        if outcome.report.passed() {
            "VALIDATION PASSED"
        } else {
            "VALIDATION FAILED"
        }
    );
    println!("=========================\n");

    println!("Matching size: {}", outcome.matching.len());
    if let Some(seeded) = outcome.seeded {
        println!("Greedy init size: {seeded}");
        if outcome.matching.is_empty() {
            println!("Greedy/Final: NA");
        } else {
            println!(
                "Greedy/Final: {:.2}%",
                100.0 * seeded as f64 / outcome.matching.len() as f64
            );
        }
    }
    println!("Time: {} ms", outcome.elapsed_ms);
}

fn write_summary(out: &Path, cmd: &Cmd, outcome: &Outcome) -> Result<()> {
    let matching: Vec<[usize; 2]> = outcome.matching.iter().map(|&(u, v)| [u, v]).collect();
    let summary = serde_json::json!({
        "tool": format!("maxmatch {}", maxmatch::VERSION),
        "engine": cmd.engine.label(),
        "input": cmd.input.display().to_string(),
        "matching_size": outcome.matching.len(),
        "matched_vertices": outcome.report.matched,
        "validation_passed": outcome.report.passed(),
        "greedy_init_size": outcome.seeded,
        "time_ms": outcome.elapsed_ms,
        "matching": matching,
    });
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&summary)?)?;
    tracing::info!(out = %out.display(), "summary written");
    Ok(())
}
