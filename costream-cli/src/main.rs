mod change;
mod sequences;

use std::{
    hint::black_box,
    num::Wrapping,
    time::{Duration, Instant},
};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use costream::{prelude::*, tests_utils::print_prefix};
use log::{error, info};

use change::Algorithm;
use sequences::Example;

#[derive(Parser)]
#[command(name = "costream")]
#[command(about = "Print, check and time lazy stream examples")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the first elements of a catalogue sequence
    Print {
        example: Example,

        /// Number of elements
        #[arg(short, default_value = "10")]
        n: usize,
    },

    /// Compare every catalogue sequence with its known prefix
    Check,

    /// Time a cursor walk over a catalogue sequence
    Stress {
        example: Example,

        /// Number of elements to read
        #[arg(long, default_value = "10000")]
        steps: usize,
    },

    /// Time the corecursive Fibonacci stream against an iterative loop
    Fib {
        /// Index of the element to compute
        #[arg(long, default_value = "200000")]
        steps: usize,
    },

    /// Count the ways to change an amount with coins 1, 2, 5, 10, 20 and 50
    Change {
        amount: usize,

        #[arg(short, long, value_enum, default_value_t = Algorithm::Stream)]
        algorithm: Algorithm,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Print { example, n } => {
            let sequence = example.build();
            println!("{}", print_prefix(&sequence.stream, n));
        }
        Commands::Check => check()?,
        Commands::Stress { example, steps } => {
            let elapsed = stress(example, steps)?;
            info!("{example}: {steps} steps");
            println!("{}", elapsed.as_secs_f64());
        }
        Commands::Fib { steps } => fib(steps)?,
        Commands::Change { amount, algorithm } => {
            let start = Instant::now();
            let ways = change::count(algorithm, amount)?;
            let elapsed = start.elapsed();
            info!("{algorithm}: {ways} ways to change {amount}");
            println!("{}", elapsed.as_micros());
        }
    }

    Ok(())
}

fn check() -> Result<()> {
    let mut failures = 0;
    for &example in Example::value_variants() {
        match example.verify() {
            Ok(prefix) => {
                let shown: Vec<String> = prefix.iter().map(|x| x.to_string()).collect();
                info!("{example}: {}", shown.join(" "));
            }
            Err(err) => {
                error!("{err}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} catalogue sequence(s) differ from their expected prefix");
    }
    Ok(())
}

/// Read and step over `steps` elements with a single cursor.
fn stress(example: Example, steps: usize) -> StreamResult<Duration> {
    let sequence = example.build();
    let start = Instant::now();
    let mut cursor = sequence.stream.begin();
    for _ in 0..steps {
        black_box(cursor.try_get()?);
        cursor.try_advance()?;
    }
    Ok(start.elapsed())
}

fn fib(steps: usize) -> Result<()> {
    let stream: Stream<Wrapping<u64>> =
        Stream::fix(|s| cons(Wrapping(0), s + cons(Wrapping(1), s)));

    let start = Instant::now();
    let mut cursor = stream.begin();
    cursor.try_advance_n(steps)?;
    let from_stream = cursor.try_get()?;
    let stream_time = start.elapsed();

    let start = Instant::now();
    let (mut a, mut b) = (Wrapping(0u64), Wrapping(1u64));
    for _ in 0..black_box(steps) {
        (a, b) = (b, a + b);
    }
    let loop_time = start.elapsed();

    if from_stream != a {
        bail!("fib({steps}): stream gave {from_stream}, loop gave {a}");
    }
    info!("fib({steps}) = {a} (mod 2^64)");
    println!("{}", stream_time.as_micros());
    println!("{}", loop_time.as_micros());
    Ok(())
}
