//! Heap-sampler demo: drives timestamped records through the buffer and
//! writes them to `log.csv`, one line per record, unbuffered.
//!
//! Run with: `cargo run -p heapring --bin sampler -- <records> [--capacity N] [--pool N] [--condvar]`

use heapring::{tasks, Config, RingBuffer, Strategy, WriterSink};
use std::fs::File;
use std::process;
use std::sync::Arc;

const LOG_FILE: &str = "log.csv";

struct Args {
    records: usize,
    capacity: usize,
    pool_size: usize,
    strategy: Strategy,
}

fn parse_args() -> Result<Args, String> {
    let mut argv = std::env::args().skip(1);

    let records = argv
        .next()
        .ok_or("missing record count")?
        .parse::<usize>()
        .map_err(|e| format!("bad record count: {e}"))?;

    let mut args = Args {
        records,
        capacity: 128,
        pool_size: 1,
        strategy: Strategy::Semaphore,
    };

    while let Some(flag) = argv.next() {
        match flag.as_str() {
            "--capacity" => {
                let value = argv.next().ok_or("--capacity needs a value")?;
                args.capacity = value.parse().map_err(|e| format!("bad capacity: {e}"))?;
            }
            "--pool" => {
                let value = argv.next().ok_or("--pool needs a value")?;
                args.pool_size = value.parse().map_err(|e| format!("bad pool size: {e}"))?;
            }
            "--condvar" => args.strategy = Strategy::CondVar,
            other => return Err(format!("unknown flag: {other}")),
        }
    }

    Ok(args)
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("usage: sampler <records> [--capacity N] [--pool N] [--condvar]");
            process::exit(2);
        }
    };

    let config = Config {
        capacity: args.capacity,
        pool_size: args.pool_size,
        strategy: args.strategy,
    };

    let buffer = match RingBuffer::new(config) {
        Ok(buffer) => Arc::new(buffer),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    println!("heapring sampler");
    println!("  records:  {}", args.records);
    println!("  capacity: {}", buffer.capacity());
    println!("  pool:     {}", buffer.pool_size());
    println!("  strategy: {:?}", args.strategy);

    let log_file = match File::create(LOG_FILE) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: cannot create {LOG_FILE}: {err}");
            process::exit(1);
        }
    };

    let sink = WriterSink::new(log_file);
    match tasks::run_pipeline(buffer, args.records, sink) {
        Ok((_, report)) => {
            println!("Writer elapsed time: {:.6}s", report.producer_elapsed.as_secs_f64());
            println!("Reader elapsed time: {:.6}s", report.consumer_elapsed.as_secs_f64());
        }
        Err(err) => {
            eprintln!("error: log sink failed: {err}");
            process::exit(1);
        }
    }
}
