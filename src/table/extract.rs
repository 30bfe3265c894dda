//! Table detection over positioned text

use std::cmp::Ordering;
use lopdf::{Document, ObjectId};
use tracing::debug;
use crate::error::Result;
use super::text::{page_fragments, TextFragment};
use super::{Grid, TableExtractor, TableSettings};

/// Fragments sharing one baseline, left to right
#[derive(Debug, Clone)]
struct TextLine {
    y: f32,
    size: f32,
    fragments: Vec<TextFragment>,
}

/// Default extractor: finds header lines by their labels and slices the lines
/// below them into columns at the header cells' x positions
#[derive(Debug, Clone, Default)]
pub struct TextTableExtractor {
    settings: TableSettings,
}

impl TextTableExtractor {
    pub fn new(settings: TableSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    /// Detect tables among already extracted fragments
    pub fn tables_from_fragments(&self, fragments: Vec<TextFragment>) -> Vec<Grid> {
        let lines = group_into_lines(fragments, self.settings.line_tolerance);

        let header_indices: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_header(line))
            .map(|(i, _)| i)
            .collect();

        let mut tables = Vec::new();
        for (n, &start) in header_indices.iter().enumerate() {
            let end = header_indices.get(n + 1).copied().unwrap_or(lines.len());
            let grid = self.build_grid(&lines[start], &lines[start + 1..end]);
            debug!("Table with {} columns and {} rows", grid[0].len(), grid.len() - 1);
            tables.push(grid);
        }
        tables
    }

    /// Header cells of a line: fragments closer than `word_gap` are one cell
    fn header_cells(&self, line: &TextLine) -> Vec<TextFragment> {
        let mut cells: Vec<TextFragment> = Vec::new();
        for fragment in &line.fragments {
            match cells.last_mut() {
                Some(cell) if fragment.x - cell.right() <= self.settings.word_gap * fragment.size => {
                    cell.text.push(' ');
                    cell.text.push_str(&fragment.text);
                    cell.width = fragment.right() - cell.x;
                }
                _ => cells.push(fragment.clone()),
            }
        }
        cells
    }

    fn is_header(&self, line: &TextLine) -> bool {
        let cells = self.header_cells(line);
        let matches = self
            .settings
            .header_markers
            .iter()
            .filter(|marker| cells.iter().any(|cell| cell.text == marker.as_str()))
            .count();
        matches >= self.settings.min_header_matches.max(1)
    }

    fn build_grid(&self, header: &TextLine, body: &[TextLine]) -> Grid {
        let header_cells = self.header_cells(header);
        let column_starts: Vec<f32> = header_cells.iter().map(|cell| cell.x).collect();
        let key_columns: Vec<usize> = header_cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| self.settings.row_keys.iter().any(|key| *key == cell.text))
            .map(|(i, _)| i)
            .collect();

        let mut grid: Grid = vec![header_cells.into_iter().map(|cell| cell.text).collect()];

        let mut previous_y = header.y;
        for line in body {
            if previous_y - line.y > self.settings.max_row_gap * header.size.max(line.size) {
                break;
            }
            previous_y = line.y;

            let mut row = vec![String::new(); column_starts.len()];
            for fragment in &line.fragments {
                let column = column_for(&column_starts, fragment.x, self.settings.column_tolerance);
                if !row[column].is_empty() {
                    row[column].push(' ');
                }
                row[column].push_str(&fragment.text);
            }

            let continues_row = grid.len() > 1
                && !key_columns.is_empty()
                && key_columns.iter().all(|&column| row[column].is_empty());
            if continues_row {
                if let Some(previous) = grid.last_mut() {
                    fold_into(previous, row);
                }
            } else {
                grid.push(row);
            }
        }

        grid
    }
}

impl TableExtractor for TextTableExtractor {
    fn extract_tables(&self, doc: &Document, page_id: ObjectId) -> Result<Vec<Grid>> {
        let fragments = page_fragments(doc, page_id)?;
        Ok(self.tables_from_fragments(fragments))
    }
}

/// Append a wrapped line's cells to the row it continues, one text line per cell line
fn fold_into(row: &mut [String], continuation: Vec<String>) {
    for (cell, more) in row.iter_mut().zip(continuation) {
        if more.is_empty() {
            continue;
        }
        if !cell.is_empty() {
            cell.push('\n');
        }
        cell.push_str(&more);
    }
}

/// Index of the right-most column starting at or left of `x`
fn column_for(column_starts: &[f32], x: f32, tolerance: f32) -> usize {
    column_starts
        .iter()
        .rposition(|&start| start <= x + tolerance)
        .unwrap_or(0)
}

/// Group fragments into lines, top of the page first
fn group_into_lines(fragments: Vec<TextFragment>, tolerance: f32) -> Vec<TextLine> {
    let mut sorted = fragments;
    sorted.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for fragment in sorted {
        match lines.last_mut() {
            Some(line) if (line.y - fragment.y).abs() <= tolerance => {
                line.size = line.size.max(fragment.size);
                line.fragments.push(fragment);
            }
            _ => lines.push(TextLine {
                y: fragment.y,
                size: fragment.size,
                fragments: vec![fragment],
            }),
        }
    }

    for line in &mut lines {
        line.fragments
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    }

    lines
}
