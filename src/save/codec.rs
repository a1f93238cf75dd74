//! Run-length text codec for grids
//!
//! One line per row, each a space-separated list of `id:run` tokens.
//! Decoding never fails: bad tokens are skipped and reported.

use std::fmt;

use crate::world::{Grid, TileId};

/// What was wrong with a skipped token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Token is not exactly `id:count`
    WrongArity,
    /// One of the fields is not a non-negative integer
    NotAnInteger,
}

/// A token skipped while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub token: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::WrongArity => {
                write!(f, "line {}: invalid token format '{}'", self.line, self.token)
            }
            DiagnosticKind::NotAnInteger => {
                write!(f, "line {}: invalid integer in token '{}'", self.line, self.token)
            }
        }
    }
}

/// Outcome of a decode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Non-empty lines that fell inside the grid
    pub rows_decoded: usize,
    pub cells_written: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Run-length encode a grid, row by row
pub fn encode(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        let mut first = true;
        for (id, run) in runs(row) {
            if !first {
                out.push(' ');
            }
            first = false;
            out.push_str(&format!("{}:{}", id, run));
        }
        out.push('\n');
    }
    out
}

/// Maximal runs of identical ids, left to right
fn runs(row: &[TileId]) -> Vec<(TileId, usize)> {
    let mut runs: Vec<(TileId, usize)> = Vec::new();
    for &id in row {
        match runs.last_mut() {
            Some((current, count)) if *current == id => *count += 1,
            _ => runs.push((id, 1)),
        }
    }
    runs
}

/// Decode run-length text into `grid`
///
/// Line index is row index. Cells not covered by the text keep their value;
/// runs past the row width and lines past the grid height are dropped.
pub fn decode(text: &str, grid: &mut Grid) -> DecodeReport {
    let mut report = DecodeReport::default();

    for (y, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let Ok(y) = i32::try_from(y) else {
            break;
        };
        if y >= grid.height() {
            log::debug!("Ignoring rows from line {} on: grid has {} rows", y + 1, grid.height());
            break;
        }
        report.rows_decoded += 1;

        let mut x: i32 = 0;
        for token in line.split(' ').filter(|t| !t.is_empty()) {
            let (id, count) = match parse_token(token) {
                Ok(parsed) => parsed,
                Err(kind) => {
                    let diagnostic = Diagnostic {
                        line: y as usize + 1,
                        token: token.to_string(),
                        kind,
                    };
                    log::warn!("Skipping save data: {}", diagnostic);
                    report.diagnostics.push(diagnostic);
                    continue;
                }
            };

            let available = (grid.width() - x).max(0) as u64;
            let written = count.min(available) as i32;
            for _ in 0..written {
                grid.set(x, y, id);
                x += 1;
            }
            report.cells_written += written as usize;
        }
    }

    report
}

fn parse_token(token: &str) -> Result<(TileId, u64), DiagnosticKind> {
    let mut parts = token.split(':');
    let (Some(id), Some(count), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DiagnosticKind::WrongArity);
    };
    let id = id.parse::<TileId>().map_err(|_| DiagnosticKind::NotAnInteger)?;
    let count = count.parse::<u64>().map_err(|_| DiagnosticKind::NotAnInteger)?;
    Ok((id, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scenario_row() {
        let mut grid = Grid::new(10, 3, 0).unwrap();
        grid.set(5, 1, 7);

        let text = encode(&grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["0:10", "0:5 7:1 0:4", "0:10"]);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_round_trip() {
        let mut grid = Grid::new(13, 7, 3).unwrap();
        for (i, (x, y)) in [(0, 0), (12, 0), (5, 3), (6, 3), (7, 3), (0, 6), (12, 6)]
            .into_iter()
            .enumerate()
        {
            grid.set(x, y, i as TileId + 1);
        }

        let mut restored = Grid::new(13, 7, 0).unwrap();
        let report = decode(&encode(&grid), &mut restored);

        assert!(report.is_clean());
        assert_eq!(report.rows_decoded, 7);
        assert_eq!(report.cells_written, 13 * 7);
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_decode_tolerates_trailing_space_and_crlf() {
        let mut grid = Grid::new(4, 2, 9).unwrap();
        let report = decode("1:2 2:2 \r\n3:4 \r\n", &mut grid);

        assert!(report.is_clean());
        assert_eq!(grid.row(0).unwrap(), &[1, 1, 2, 2]);
        assert_eq!(grid.row(1).unwrap(), &[3, 3, 3, 3]);
    }

    #[test]
    fn test_decode_clips_overflow() {
        let mut grid = Grid::new(3, 1, 0).unwrap();
        let report = decode("5:2 6:10 7:1\n1:3\n", &mut grid);

        assert_eq!(grid.row(0).unwrap(), &[5, 5, 6]);
        assert_eq!(report.rows_decoded, 1);
        assert_eq!(report.cells_written, 3);
        assert!(report.is_clean());
    }

    #[test]
    fn test_corrupted_line_keeps_other_rows() {
        let mut grid = Grid::new(6, 3, 2).unwrap();
        let report = decode("1:6\n3:x 1:4\n4:6\n", &mut grid);

        assert_eq!(grid.row(0).unwrap(), &[1; 6]);
        // skipped token does not advance the cursor
        assert_eq!(grid.row(1).unwrap(), &[1, 1, 1, 1, 2, 2]);
        assert_eq!(grid.row(2).unwrap(), &[4; 6]);

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.diagnostics[0].token, "3:x");
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::NotAnInteger);
    }

    #[test]
    fn test_malformed_tokens_are_reported() {
        let mut grid = Grid::new(4, 1, 0).unwrap();
        let report = decode("7 1:2:3 -1:2 :1 2:2", &mut grid);

        let kinds: Vec<_> = report.diagnostics.iter().map(|d| d.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::WrongArity,
                DiagnosticKind::WrongArity,
                DiagnosticKind::NotAnInteger,
                DiagnosticKind::NotAnInteger,
            ]
        );
        assert_eq!(grid.row(0).unwrap(), &[2, 2, 0, 0]);
    }

    #[test]
    fn test_empty_lines_keep_row_index() {
        let mut grid = Grid::new(2, 3, 0).unwrap();
        let report = decode("1:2\n\n3:2\n", &mut grid);

        assert_eq!(report.rows_decoded, 2);
        assert_eq!(grid.row(1).unwrap(), &[0, 0]);
        assert_eq!(grid.row(2).unwrap(), &[3, 3]);
    }
}
