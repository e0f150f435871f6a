//! Table rendering for matched files

use crate::app::models::MatchedFile;

const HEADERS: [&str; 5] = ["GROUPS", "DATASET", "FILE", "UPDATED", "LATEST"];
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render matches as a plain-text table
///
/// Repeated groups and dataset values on consecutive rows are blanked out so
/// each dataset reads as one block. Rows are printed in the order given.
pub fn render_table(matches: &[MatchedFile<'_>]) -> String {
    let mut rows: Vec<[String; 5]> = Vec::with_capacity(matches.len());
    let mut previous: Option<(String, &str)> = None;

    for matched in matches {
        let groups = matched.groups().join(", ");
        let same_block = previous
            .as_ref()
            .is_some_and(|(g, d)| *g == groups && *d == matched.dataset);

        let (groups_cell, dataset_cell) = if same_block {
            (String::new(), String::new())
        } else {
            (groups.clone(), matched.dataset.to_string())
        };

        rows.push([
            groups_cell,
            dataset_cell,
            matched.name.to_string(),
            matched.updated.format(UPDATED_FORMAT).to_string(),
            if matched.latest { "*" } else { "" }.to_string(),
        ]);
        previous = Some((groups, matched.dataset));
    }

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut output = String::new();
    push_row(&mut output, &HEADERS.map(str::to_string), &widths);
    let separator = widths.map(|w| "-".repeat(w));
    push_row(&mut output, &separator, &widths);
    for row in &rows {
        push_row(&mut output, row, &widths);
    }
    output
}

fn push_row(output: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(line.trim_end());
    output.push('\n');
}
