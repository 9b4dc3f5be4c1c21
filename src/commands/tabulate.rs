use super::{CommandError, Result};
use crate::formats::{load_ballots, read_ballot_lines};
use crate::metadata::ElectionMetadata;
use crate::report::transcript::{header_lines, round_lines, summary_lines};
use crate::report::{write_report, ElectionReport, TranscriptLine};
use crate::tabulator::result::ElectionResult;
use crate::tabulator::Tabulator;
use crate::util::file_hash;
use colored::*;
use instant::Instant;
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct TabulateOptions {
    /// Write `<slug>.txt` and `<slug>.json` here.
    pub report_dir: Option<PathBuf>,
    /// Drop invalid ballot lines instead of refusing to count.
    pub skip_invalid: bool,
    /// Wait for Enter between rounds.
    pub step: bool,
    /// Only print the final summary.
    pub quiet: bool,
    /// Gzip the JSON report.
    pub compress: bool,
}

fn print_lines(lines: &[TranscriptLine]) {
    for line in lines {
        println!("{}", line.colored());
    }
}

fn wait_for_enter() -> Result<()> {
    println!("Press Enter to advance to the next round of vote tabulation.");
    let mut buf = String::new();
    std::io::stdin().lock().read_line(&mut buf)?;
    Ok(())
}

pub fn tabulate(meta_path: &Path, options: &TabulateOptions) -> Result<ElectionResult> {
    let metadata = ElectionMetadata::read(meta_path)?;
    let candidates = metadata.candidate_registry()?;
    let ballots_path = metadata.ballots_path(meta_path);

    println!(
        "📋 Reading ballots for {} from {}",
        metadata.name.bright_cyan(),
        ballots_path.display()
    );

    let lines = read_ballot_lines(&ballots_path)?;
    let loaded = load_ballots(&lines, &candidates);

    if !loaded.rejected.is_empty() {
        for rejected in &loaded.rejected {
            eprintln!(
                "{}",
                format!("❌ Line {}: {} ({})", rejected.line, rejected.text, rejected.error).red()
            );
        }
        if !options.skip_invalid {
            return Err(CommandError::RejectedBallots {
                count: loaded.rejected.len(),
                path: ballots_path,
            });
        }
        eprintln!(
            "⚠️  Skipping {} invalid ballots",
            loaded.rejected.len().to_string().yellow()
        );
    }

    let start = Instant::now();
    let mut tabulator = Tabulator::new(candidates, loaded.ballots, metadata.seats)?;

    let mut transcript = header_lines(
        &metadata.name,
        tabulator.quota(),
        tabulator.ballots().len(),
        tabulator.seats(),
    );
    if !options.quiet {
        print_lines(&transcript);
    }

    while let Some(round) = tabulator.step() {
        let lines = round_lines(round);
        if !options.quiet {
            print_lines(&lines);
        }
        transcript.extend(lines);

        if options.step && !options.quiet && !tabulator.is_done() {
            wait_for_enter()?;
        }
    }

    let result = tabulator.into_result();
    let elapsed = start.elapsed();

    let summary = summary_lines(&result);
    print_lines(&summary);
    transcript.extend(summary);

    println!(
        "⏱️  Tabulated {} ballots in {} rounds ({:.2} ms)",
        result.ballot_count.to_string().bright_green(),
        result.rounds.len().to_string().bright_green(),
        elapsed.as_secs_f64() * 1000.0
    );

    if let Some(report_dir) = &options.report_dir {
        let report = ElectionReport::new(
            &metadata,
            &ballots_path,
            file_hash(&ballots_path)?,
            &loaded.rejected,
            result.clone(),
        );
        let written = write_report(
            report_dir,
            &metadata.slug(),
            &transcript,
            &report,
            options.compress,
        )?;
        for path in written {
            println!("✅ Wrote {}", path.display().to_string().bright_green());
        }
    }

    Ok(result)
}
