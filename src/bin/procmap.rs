//! # Purpose
//!
//! Prints the VMAs of a process one per line, in the layout of
//! `/proc/<pid>/maps`, with the name and build id as extra tab separated
//! columns. Only file backed mappings are listed unless `--all` is given.
//!
//! # Usage
//!
//! `procmap <pid> [--all] [--start <hex address>]`
//!
//! Set `PROCMAP_LOG` to `debug` or `trace` to see the individual queries.

use std::io::Write;

use argh::FromArgs;
use libc_alloc::LibcAlloc;
use procmap::{Pid, ProcMaps, QueryFlags};

#[global_allocator]
static ALLOCATOR: LibcAlloc = LibcAlloc;

#[derive(FromArgs)]
/// List the memory mappings of a process through PROCMAP_QUERY.
struct Args {
    /// process id
    #[argh(positional)]
    pid: Pid,

    /// include anonymous mappings
    #[argh(switch, short = 'a')]
    all: bool,

    /// address to start walking from, in hex
    #[argh(option, short = 's', from_str_fn(parse_hex), default = "0")]
    start: u64,
}

fn parse_hex(value: &str) -> Result<u64, String> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(digits, 16).map_err(|err| format!("invalid address {value:?}: {err}"))
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        // filtered through log::set_max_level
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("[{}] ({}) {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

fn init_logger() {
    let level = std::env::var("PROCMAP_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(log::LevelFilter::Warn);

    if log::set_logger(&StderrLogger).is_ok() {
        log::set_max_level(level);
    }
}

/// Like `argh::from_env`, but a bad command line also gets the full usage.
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match Args::from_args(&["procmap"], &args) {
        Ok(args) => args,
        Err(exit) if exit.status.is_ok() => {
            println!("{}", exit.output);
            std::process::exit(0);
        }
        Err(exit) => {
            eprintln!("Error: {}", exit.output.trim_end());
            if let Err(usage) = Args::from_args(&["procmap"], &["--help"]) {
                eprintln!("{}", usage.output);
            }
            std::process::exit(1);
        }
    }
}

fn exit_err(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn walk_flags(all: bool) -> QueryFlags {
    if all {
        QueryFlags::COVERING_OR_NEXT_VMA
    } else {
        QueryFlags::COVERING_OR_NEXT_VMA | QueryFlags::FILE_BACKED_VMA
    }
}

fn list_mappings(args: &Args) -> Result<(), String> {
    let maps = ProcMaps::open(args.pid).map_err(|err| err.to_string())?;

    let flags = walk_flags(args.all);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;

    let mut walk = procmap::Walk::starting_at(&maps, args.start, flags);
    for region in walk.by_ref() {
        writeln!(out, "{region}").map_err(|err| format!("writing output failed: {}", err))?;
        count += 1;
    }

    match walk.error() {
        Some(err) if !err.is_not_found() => log::info!("listed {count} mappings, stopped by {err}"),
        _ => log::debug!("listed {count} mappings"),
    }

    out.flush().map_err(|err| format!("writing output failed: {}", err))
}

fn main() {
    init_logger();
    let args = parse_args();

    if let Err(error) = list_mappings(&args) {
        exit_err(&error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_with_and_without_prefix() {
        assert_eq!(parse_hex("0x1000"), Ok(0x1000));
        assert_eq!(parse_hex("1000"), Ok(0x1000));
        assert_eq!(parse_hex("7fffdead0000"), Ok(0x7fff_dead_0000));
    }

    #[test]
    fn bad_hex_is_rejected() {
        let err = parse_hex("zz").unwrap_err();
        assert!(err.starts_with("invalid address \"zz\""), "{err}");
        assert!(parse_hex("0x").is_err());
    }

    #[test]
    fn defaults_walk_from_zero_file_backed() {
        let args = Args::from_args(&["procmap"], &["42"]).unwrap_or_else(|e| panic!("{}", e.output));
        assert_eq!((args.pid, args.all, args.start), (42, false, 0));
        assert_eq!(
            walk_flags(args.all),
            QueryFlags::COVERING_OR_NEXT_VMA | QueryFlags::FILE_BACKED_VMA
        );

        let args = Args::from_args(&["procmap"], &["-a", "-s", "0x400000", "7"])
            .unwrap_or_else(|e| panic!("{}", e.output));
        assert_eq!((args.pid, args.all, args.start), (7, true, 0x400000));
        assert_eq!(walk_flags(args.all), QueryFlags::COVERING_OR_NEXT_VMA);
    }

    #[test]
    fn pid_must_be_a_number() {
        assert!(Args::from_args(&["procmap"], &["abc"]).is_err());
        assert!(Args::from_args(&["procmap"], &[]).is_err());
    }
}
