use super::Result;
use crate::formats::{append_ballot, parse_ranking};
use crate::metadata::ElectionMetadata;
use crate::model::validate;
use colored::*;
use std::io::{BufRead, Write};
use std::path::Path;

/// Read ballots from `input` until `quit` or end of input, appending every
/// valid one to the election's ballot file. Invalid ballots are reported and
/// the voter is asked again. Returns the number of ballots accepted.
pub fn enter<R: BufRead, W: Write>(meta_path: &Path, input: R, mut output: W) -> Result<usize> {
    let metadata = ElectionMetadata::read(meta_path)?;
    let candidates = metadata.candidate_registry()?;
    let ballots_path = metadata.ballots_path(meta_path);

    writeln!(
        output,
        "{}",
        format!("~~~~~ENTER VOTES: {}~~~~~", metadata.name).bright_cyan()
    )?;
    writeln!(
        output,
        "List as many candidates as you wish separated by commas, most preferred first. Enter \"quit\" when done."
    )?;

    let listing = candidates
        .iter()
        .map(|(id, c)| format!("{}. {}", id.0 + 1, c.name()))
        .collect::<Vec<_>>()
        .join("     ");

    let mut accepted = 0;
    writeln!(output, "{}", listing)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }

        let ranking = parse_ranking(&line).and_then(|ranking| {
            validate(&ranking, &candidates)?;
            Ok(ranking)
        });

        match ranking {
            Ok(ranking) => {
                append_ballot(&ballots_path, &ranking)?;
                accepted += 1;
                log::info!("Accepted ballot #{}: {:?}", accepted, ranking);
                writeln!(output, "{}", listing)?;
            }
            Err(e) => {
                writeln!(
                    output,
                    "{}",
                    format!("Your ballot has an error ({}), please re-enter your votes:", e).red()
                )?;
            }
        }
    }

    writeln!(
        output,
        "✅ Recorded {} ballots in {}",
        accepted.to_string().bright_green(),
        ballots_path.display()
    )?;

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::read_ballot_lines;

    #[test]
    fn test_enter_reprompts_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let meta_path = dir.path().join("club.json");
        ElectionMetadata {
            name: "Club".to_string(),
            seats: 1,
            candidates: vec!["Alice".to_string(), "Bob".to_string()],
            ballots: Some("votes.csv".to_string()),
        }
        .write(&meta_path)
        .unwrap();

        let input = "alice, bob\nalice, zed\n\nBOB\nquit\nalice\n";
        let mut output = Vec::new();
        let accepted = enter(&meta_path, input.as_bytes(), &mut output).unwrap();

        assert_eq!(accepted, 2);
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("please re-enter your votes").count(), 2);

        let lines = read_ballot_lines(&dir.path().join("votes.csv")).unwrap();
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["alice, bob", "BOB"]);
    }
}
