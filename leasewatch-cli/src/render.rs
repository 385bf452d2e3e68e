//! Terminal table rendering.
//!
//! Redraws the utilization table in place on an interactive terminal;
//! appends plain rows when stdout is a pipe or file.

use std::io::{self, IsTerminal, Write};

use leasewatch_monitor::PrefixSnapshot;

pub struct TableRenderer {
    interactive: bool,
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            interactive: io::stdout().is_terminal(),
        }
    }

    pub fn render(&mut self, snapshot: &[PrefixSnapshot]) {
        let mut out = io::stdout().lock();
        if self.interactive {
            // Clear and home, then repaint the whole table.
            let _ = write!(out, "\x1b[2J\x1b[H");
        }
        let _ = write_table(&mut out, snapshot);
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn write_table(out: &mut impl Write, snapshot: &[PrefixSnapshot]) -> io::Result<()> {
    writeln!(
        out,
        "{:<18} {:>9} {:>19} {:>11}",
        "IP-Prefix", "Max-hosts", "Allocated addresses", "Utilization"
    )?;
    for prefix in snapshot {
        writeln!(
            out,
            "{:<18} {:>9} {:>19} {:>10.2}%",
            format!("{}/{}", prefix.address, prefix.mask),
            prefix.max_clients,
            prefix.allocated,
            prefix.utilization
        )?;
    }
    out.flush()
}
