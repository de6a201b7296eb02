//! Parser for EXIOBASE tab-separated matrix files.
//!
//! `Z.txt` and `Y.txt` share one layout: two column-header lines (the level
//! name sits in one of the two leading cells, the labels follow), one
//! index-name line whose value cells are empty, then one line per row with
//! two label cells followed by the values.
//!
//! ```text
//! region  <tab>         AT     AT     BE     ...
//! sector  <tab>         Wheat  Steel  Wheat  ...
//! region  sector
//! AT      Wheat         0.1    2.0    0.0    ...
//! ```

use std::io::BufRead;

use nalgebra::DMatrix;

use crate::axis::{Axis, Label};
use crate::error::MrioError;
use crate::matrix::LabeledMatrix;

/// Number of leading label cells on every line.
const LABEL_CELLS: usize = 2;

/// Parse one matrix file. `file` names the source in error messages.
///
/// # Errors
///
/// - [`MrioError::Io`] if reading fails.
/// - [`MrioError::Parse`] for a malformed header, a short row, or a value
///   that is not a finite number.
/// - [`MrioError::DuplicateLabel`] if a row or column label repeats.
pub fn parse_matrix<R: BufRead>(reader: R, file: &str) -> Result<LabeledMatrix, MrioError> {
    let mut header_levels: Vec<(String, Vec<String>)> = Vec::new();
    let mut index_levels: Option<[String; 2]> = None;
    let mut row_labels: Vec<Label> = Vec::new();
    let mut data: Vec<f64> = Vec::new();
    let mut column_count: usize = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number.saturating_add(1);
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split('\t').collect();
        let (labels, rest) = cells.split_at(LABEL_CELLS.min(cells.len()));
        let first = labels.first().map_or("", |c| c.trim());
        let second = labels.get(1).map_or("", |c| c.trim());

        if index_levels.is_none() {
            if rest.iter().all(|c| c.trim().is_empty()) {
                if header_levels.len() != 2 {
                    return Err(parse_error(
                        file,
                        line_no,
                        format!("expected 2 column header levels, found {}", header_levels.len()),
                    ));
                }
                index_levels = Some([first.to_owned(), second.to_owned()]);
                column_count = header_levels.first().map_or(0, |(_, l)| l.len());
                continue;
            }

            let level = if first.is_empty() { second } else { first };
            if level.is_empty() {
                let message = "header line without a level name".to_owned();
                return Err(parse_error(file, line_no, message));
            }
            header_levels.push((
                level.to_owned(),
                rest.iter().map(|c| c.trim().to_owned()).collect(),
            ));
            continue;
        }

        if rest.len() != column_count {
            return Err(parse_error(
                file,
                line_no,
                format!("expected {column_count} values, found {}", rest.len()),
            ));
        }
        row_labels.push(Label::new(first, second));
        for cell in rest {
            let value = cell.trim().parse::<f64>().map_err(|e| {
                parse_error(file, line_no, format!("invalid number {cell:?}: {e}"))
            })?;
            if !value.is_finite() {
                return Err(parse_error(file, line_no, format!("non-finite value {cell:?}")));
            }
            data.push(value);
        }
    }

    let Some(index_levels) = index_levels else {
        return Err(parse_error(file, 0, "missing index name line".to_owned()));
    };

    let mut levels = header_levels.into_iter();
    let (Some((region_level, regions)), Some((name_level, names))) = (levels.next(), levels.next())
    else {
        return Err(parse_error(file, 0, "missing column header levels".to_owned()));
    };
    if regions.len() != names.len() {
        return Err(parse_error(
            file,
            0,
            format!("header levels differ in length ({} vs {})", regions.len(), names.len()),
        ));
    }

    let column_labels = regions
        .into_iter()
        .zip(names)
        .map(|(region, name)| Label::new(region, name))
        .collect();
    let columns = Axis::new([region_level, name_level], column_labels, "columns")?;
    let row_count = row_labels.len();
    let rows = Axis::new(index_levels, row_labels, "rows")?;
    let values = DMatrix::from_row_slice(row_count, column_count, &data);

    LabeledMatrix::new(rows, columns, values)
}

fn parse_error(file: &str, line: usize, message: String) -> MrioError {
    MrioError::Parse {
        file: file.to_owned(),
        line,
        message,
    }
}
