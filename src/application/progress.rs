//! Console progress bar for the export loop.

use std::io::{self, Write};

const BAR_WIDTH: usize = 50;

/// Render one progress line.
///
/// Starts with a carriage return so successive updates overwrite each other;
/// the 100% line ends with a newline instead.
#[must_use]
pub fn render_progress(percent: usize) -> String {
    let percent = percent.min(100);
    let bar = "#".repeat(percent / 2);
    let line = format!("\r[{percent:>3}%]: |{bar:<BAR_WIDTH$}|");

    if percent == 100 {
        line + "\n"
    } else {
        line
    }
}

/// Tracks processed items and writes a progress line per item.
pub struct ProgressReporter<W: Write> {
    total: usize,
    processed: usize,
    out: W,
}

impl<W: Write> ProgressReporter<W> {
    pub const fn new(total: usize, out: W) -> Self {
        Self {
            total,
            processed: 0,
            out,
        }
    }

    /// Record one finished item and emit the update.
    ///
    /// Returns the percentage that was displayed.
    ///
    /// # Errors
    /// Returns error if the output cannot be written.
    pub fn advance(&mut self) -> io::Result<usize> {
        self.processed = (self.processed + 1).min(self.total);
        let percent = if self.total == 0 {
            100
        } else {
            self.processed * 100 / self.total
        };

        self.out.write_all(render_progress(percent).as_bytes())?;
        self.out.flush()?;

        Ok(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_intermediate() {
        let line = render_progress(50);
        assert!(line.starts_with("\r[ 50%]: |"));
        assert!(line.ends_with('|'));
        assert_eq!(line.matches('#').count(), 25);
        // "\r[ 50%]: |" + 50 cells + "|"
        assert_eq!(line.len(), 10 + BAR_WIDTH + 1);
    }

    #[test]
    fn test_render_complete_has_newline() {
        let line = render_progress(100);
        assert!(line.starts_with("\r[100%]: |"));
        assert!(line.ends_with("|\n"));
        assert_eq!(line.matches('#').count(), 50);
    }

    #[test]
    fn test_reporter_emits_one_update_per_item() {
        let mut out = Vec::new();
        let mut reporter = ProgressReporter::new(3, &mut out);
        let percents: Vec<usize> = (0..3).map(|_| reporter.advance().unwrap()).collect();
        assert_eq!(percents, vec![33, 66, 100]);

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches('\r').count(), 3);
        assert_eq!(output.matches('\n').count(), 1);
        assert!(output.ends_with('\n'));
    }
}
