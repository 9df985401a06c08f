//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `chronos_core` linkage.
//! - Print a month grid (`chronos_cli [YYYY-MM]`) for quick layout checks.

use chrono::{Datelike, NaiveDate};
use chronos_core::{month_grid, EngineConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("chronos_core ping={}", chronos_core::ping());
    println!("chronos_core version={}", chronos_core::core_version());

    let mut config = EngineConfig::default();
    if let Err(err) = config.apply_env_overrides() {
        eprintln!("config error: {err}");
        return ExitCode::FAILURE;
    }

    let (year, month) = match std::env::args().nth(1) {
        Some(arg) => match parse_year_month(&arg) {
            Some(pair) => pair,
            None => {
                eprintln!("expected YYYY-MM, got `{arg}`");
                return ExitCode::FAILURE;
            }
        },
        None => {
            let today = config.today();
            (today.year(), today.month())
        }
    };

    let grid = match month_grid(year, month, config.week_start) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    println!("{year}-{month:02}");
    println!("{}", config.week_start.labels().join(" "));
    for week in &grid.weeks {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                if cell.is_in_target_month {
                    format!("{:>3}", cell.date.day())
                } else {
                    format!("{:>3}", ".")
                }
            })
            .collect();
        println!("{}", row.join(" "));
    }
    ExitCode::SUCCESS
}

fn parse_year_month(value: &str) -> Option<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d").ok()?;
    Some((first.year(), first.month()))
}
