use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stv_tally::commands::{enter, info, new_election, tabulate, TabulateOptions};

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new election definition.
    New {
        /// Election definition file to write.
        meta_file: PathBuf,
        /// Name of the election.
        #[clap(long)]
        name: String,
        /// Number of seats to fill.
        #[clap(long)]
        seats: usize,
        /// Candidate name; repeat once per candidate, in ballot order.
        #[clap(long = "candidate", required = true)]
        candidates: Vec<String>,
        /// Ballot file, relative to the definition file.
        #[clap(long)]
        ballots: Option<String>,
        /// Overwrite an existing definition.
        #[clap(long)]
        force: bool,
    },
    /// Enter ballots from standard input.
    Enter {
        /// Election definition file.
        meta_file: PathBuf,
    },
    /// Validate and dump info about an election.
    Info {
        /// Election definition file.
        meta_file: PathBuf,
    },
    /// Tabulate an election and print the round-by-round transcript.
    Tabulate {
        /// Election definition file.
        meta_file: PathBuf,
        /// Write the transcript and a JSON report to this directory.
        #[clap(long)]
        report_dir: Option<PathBuf>,
        /// Ignore invalid ballots instead of refusing to count.
        #[clap(long)]
        skip_invalid: bool,
        /// Wait for Enter between rounds.
        #[clap(long)]
        step: bool,
        /// Only print the final tally.
        #[clap(long)]
        quiet: bool,
        /// Gzip the JSON report.
        #[clap(long)]
        compress: bool,
    },
}

fn main() {
    env_logger::init();
    let opts = Opts::parse();

    let result = match opts.command {
        Command::New {
            meta_file,
            name,
            seats,
            candidates,
            ballots,
            force,
        } => new_election(&meta_file, &name, seats, &candidates, ballots, force).map(|_| ()),
        Command::Enter { meta_file } => {
            let stdin = std::io::stdin();
            enter(&meta_file, stdin.lock(), std::io::stdout()).map(|_| ())
        }
        Command::Info { meta_file } => info(&meta_file).map(|_| ()),
        Command::Tabulate {
            meta_file,
            report_dir,
            skip_invalid,
            step,
            quiet,
            compress,
        } => tabulate(
            &meta_file,
            &TabulateOptions {
                report_dir,
                skip_invalid,
                step,
                quiet,
                compress,
            },
        )
        .map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
