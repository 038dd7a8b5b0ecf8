use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::info;

use pcb_placer::model::Design;
use pcb_placer::solver::{self, GAOptions, SequentialOptions};

#[derive(Parser)]
#[command(name = "placer_cli", about = "Run a PCB placement solver against a Design file")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the deterministic greedy sequential placer.
    Sequential {
        design: PathBuf,
        #[arg(long, default_value_t = 16)]
        nx: usize,
        #[arg(long, default_value_t = 10)]
        ny: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        w_pair: f64,
        #[arg(long, default_value_t = 0.3)]
        w_longest: f64,
    },
    /// Run the parallel island-model genetic algorithm.
    Ga {
        design: PathBuf,
        #[arg(long, default_value_t = 16)]
        nx: usize,
        #[arg(long, default_value_t = 10)]
        ny: usize,
        #[arg(long, default_value_t = 120)]
        pop_size: usize,
        #[arg(long, default_value_t = 400)]
        generations: u32,
        #[arg(long, default_value_t = 0.2)]
        mut_rate: f64,
        #[arg(long, default_value_t = 2)]
        elite: usize,
        #[arg(long, default_value_t = 4)]
        islands: usize,
        #[arg(long, default_value_t = 20)]
        migration_interval: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        w_pair: f64,
        #[arg(long, default_value_t = 0.3)]
        w_longest: f64,
    },
}

fn load_design(path: &PathBuf) -> Design {
    let text = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("failed to read {}: {}", path.display(), err);
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|err| {
        eprintln!("failed to parse design json: {}", err);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let response = match cli.command {
        Command::Sequential {
            design,
            nx,
            ny,
            seed,
            w_pair,
            w_longest,
        } => {
            let design = load_design(&design);
            info!("running sequential placer");
            solver::solve_sequential(&design, SequentialOptions { nx, ny, seed, w_pair, w_longest })
        }
        Command::Ga {
            design,
            nx,
            ny,
            pop_size,
            generations,
            mut_rate,
            elite,
            islands,
            migration_interval,
            seed,
            w_pair,
            w_longest,
        } => {
            let design = load_design(&design);
            info!("running island-model GA");
            solver::solve_ga(
                &design,
                GAOptions {
                    nx,
                    ny,
                    pop_size,
                    generations,
                    mut_rate,
                    elite,
                    islands,
                    migration_interval,
                    seed,
                    w_pair,
                    w_longest,
                },
            )
        }
    };

    match response {
        Ok(response) => {
            let json = serde_json::to_string_pretty(&response).expect("response is serializable");
            println!("{}", json);
        }
        Err(err) => {
            eprintln!("placement failed: {}", err);
            process::exit(1);
        }
    }
}
