//! Console rendering.
//!
//! Everything the operator sees on stdout is written here. Diagnostics go
//! through `tracing` to stderr instead.

use std::io::{self, Write};

use sonic_sai::SaiError;

use crate::clear::ClearResult;
use crate::snapshot::{CounterCell, StatsSnapshot};

/// Usage block printed when the program is invoked with arguments.
pub const USAGE: &str = "\
Syntax: bststat

Parameters: None

Example: The following command is used to see the bst stats of a port
         bststat

Usage Guidelines: This program requests the user to enter the port
                  number interactively
";

pub fn write_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "User Menu: Select one of the following options")?;
    writeln!(out, "1. Display bst statistics of a port.")?;
    writeln!(out, "2. Clear bst statistics of a port.")?;
    writeln!(out, "9. Launch diagnostic shell")?;
    writeln!(out, "0. Quit the application.")?;
    out.flush()
}

pub fn write_port_prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Enter the port number.")?;
    out.flush()
}

pub fn write_invalid_option(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Invalid option entered. Please re-enter.")
}

pub fn write_exit(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Exiting the application.")?;
    out.flush()
}

/// Writes `Failed to <action>, rc = <code> (<status>).` set off by a blank line.
pub fn write_error(out: &mut impl Write, action: &str, err: &SaiError) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Failed to {}, rc = {} ({}).",
        action,
        err.code(),
        err.status()
    )
}

/// Writes one display request.
///
/// A sync failure is reported first, followed by the kinds whose values are
/// the last latched ones. Each kind then gets its values in queue
/// order, the read error at the failing queue, one line naming the queues
/// left unread, and a closing blank line.
pub fn write_snapshot(out: &mut impl Write, snapshot: &StatsSnapshot) -> io::Result<()> {
    if let Some(failure) = snapshot.sync_failure() {
        write_error(out, "sync the state of port", &failure.error)?;
        let stale: Vec<&str> = std::iter::once(&failure.kind)
            .chain(failure.unsynced.iter())
            .map(|k| k.name)
            .collect();
        writeln!(
            out,
            "BST Counters: {} not synced, last latched values shown",
            stale.join(", ")
        )?;
    }

    for row in snapshot.rows() {
        let name = row.kind().name;
        let mut skipped = Vec::new();
        for (queue, cell) in row.cells().iter().enumerate() {
            match cell {
                CounterCell::Value(value) => writeln!(
                    out,
                    "BST Counter: {} for COS queue: {} is : {}",
                    name, queue, value
                )?,
                CounterCell::Failed(err) => write_error(out, "get the port stats", err)?,
                CounterCell::NotRead => skipped.push(queue.to_string()),
            }
        }
        if !skipped.is_empty() {
            writeln!(
                out,
                "BST Counter: {} for COS queues: {} not read",
                name,
                skipped.join(", ")
            )?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Writes one clear request.
pub fn write_clear_result(out: &mut impl Write, result: &ClearResult) -> io::Result<()> {
    for kind in crate::catalog::counters() {
        if let Some(failure) = result.failures.iter().find(|f| f.kind.id == kind.id) {
            write_error(out, "clear the port stats", &failure.error)?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    if result.is_complete() {
        writeln!(out, "Port {} stats cleared", result.port)?;
    } else {
        writeln!(
            out,
            "Port {} stats partially cleared ({} of {} counters)",
            result.port,
            result.cleared.len(),
            crate::catalog::counters().len()
        )?;
    }
    out.flush()
}
