//! File-based matchmaking run used by the `run` command

use crate::core::Matchmaker;
use crate::error::RunError;
use crate::models::{MatchParams, MatchReport, Pair};
use crate::tables;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Tables read and written by one run
#[derive(Debug, Clone)]
pub struct RunFiles {
    pub registrations: PathBuf,
    pub history: PathBuf,
    pub output: PathBuf,
    pub deny_list: Option<PathBuf>,
}

pub fn print_pairs<W: Write>(out: &mut W, pairs: &[Pair]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<16} {:<16} {:<16} {:<16}",
        "male first name", "male last name", "female first name", "female last name"
    )?;
    for pair in pairs {
        writeln!(
            out,
            "{:<16} {:<16} {:<16} {:<16}",
            pair.male_first_name, pair.male_last_name, pair.female_first_name, pair.female_last_name
        )?;
    }
    Ok(())
}

/// Make one round of matches from the tables in `files`
///
/// The history table is created when missing. Notices go to `out`, followed
/// by the assignment table when `verbose` is set. The new pairs replace the
/// output table and are appended to history stamped with `at`. Nothing is
/// written when matching fails.
pub fn run<W: Write>(
    files: &RunFiles,
    params: MatchParams,
    verbose: bool,
    at: DateTime<Utc>,
    out: &mut W,
) -> Result<MatchReport, RunError> {
    let registrations = tables::read_people(&files.registrations)?;
    let history = tables::read_history(&files.history)?;
    let deny_list = files
        .deny_list
        .as_ref()
        .map(tables::read_people)
        .transpose()?;

    let report = Matchmaker::new(params).make_matches(&registrations, &history, deny_list.as_deref())?;

    for notice in &report.diagnostics {
        writeln!(out, "{}", notice)?;
    }

    tables::write_pairs(&files.output, &report.pairs)?;
    if verbose {
        print_pairs(out, &report.pairs)?;
    }

    tables::append_history(&files.history, &tables::stamp_pairs(&report.pairs, at))?;

    info!(
        "Wrote {} pairs to {} and appended them to {}",
        report.pairs.len(),
        files.output.display(),
        files.history.display()
    );
    Ok(report)
}
