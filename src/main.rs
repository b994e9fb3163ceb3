/// Command-line interface for the sample scheduling system.
///
/// Runs one scheduling batch from a JSON configuration and prints the
/// resulting meeting schedule.
///
/// Usage: sample-scheduler [CONFIG.json] [--today YYYY-MM-DD]
use chrono::{Local, NaiveDate};
use sample_scheduler::models::parse_date;
use sample_scheduler::pipeline::{self, RunReport};
use sample_scheduler::{Config, Result};
use std::path::PathBuf;
use std::process::ExitCode;

struct SchedulerCli {
    config_path: Option<PathBuf>,
    today: NaiveDate,
}

impl SchedulerCli {
    fn from_args(args: &[String]) -> Result<Self> {
        let mut config_path = None;
        let mut today = Local::now().date_naive();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--today" => {
                    let value = iter.next().map(String::as_str).unwrap_or("");
                    today = parse_date(value)?;
                }
                path => config_path = Some(PathBuf::from(path)),
            }
        }

        Ok(SchedulerCli { config_path, today })
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       SEQUENCING SAMPLE MEETING SCHEDULE");
        println!("{}", "=".repeat(60));
    }

    fn print_report(&self, report: &RunReport, config: &Config) {
        let schedule = &report.schedule;

        println!("\n--- Scheduling Results ---");
        println!("  Run: {}", schedule.run_id);
        println!("  Run date: {}", schedule.generated_on);
        println!("  Samples loaded: {}", report.summary.total_records);
        println!("  Samples scheduled: {}", schedule.len());
        println!("  Excluded dates: {}", report.excluded_dates);

        if schedule.is_empty() {
            println!("\nNo eligible samples to schedule");
            return;
        }

        if let (Some(first), Some(last)) = (schedule.first_meeting(), schedule.last_meeting()) {
            println!("  Meetings: {} .. {}", first, last);
        }

        println!("\nSamples per tier:");
        for (tier, count) in &report.summary.by_tier {
            println!("  tier {:>3}: {}", tier, count);
        }

        let max_display = 20;
        println!("\nUpcoming meetings:");
        for entry in schedule.entries.iter().take(max_display) {
            println!(
                "  {:>4}. {} - {:15} ({})",
                entry.priority_rank,
                entry.meeting_date.format("%a %Y-%m-%d"),
                entry.sample.sample_id,
                entry.reason_for_priority
            );
        }
        if schedule.len() > max_display {
            println!("\n... and {} more samples", schedule.len() - max_display);
        }

        if let Some(path) = &config.output_csv {
            println!("\nSchedule written to {}", path.display());
        }
    }

    fn run(&self) -> Result<()> {
        self.print_header();

        let config = match &self.config_path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let report = pipeline::run(&config, self.today)?;
        self.print_report(&report, &config);
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = SchedulerCli::from_args(&args).and_then(|cli| cli.run());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("scheduling run failed: {}", e);
            eprintln!("\nError: {}", e);
            ExitCode::FAILURE
        }
    }
}
