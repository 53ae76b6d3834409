use crate::model::Snapshot;
use crate::util::format_timestamp;

/// One-line caption: row count and when the snapshot was taken.
pub fn title(snapshot: &Snapshot) -> String {
    format!(
        "{} processes at {}",
        snapshot.len(),
        format_timestamp(&snapshot.taken_at())
    )
}

/// Lay a snapshot out as fixed-width text, one line per process.
pub fn render(snapshot: &Snapshot) -> String {
    let columns = snapshot.columns();
    let mut widths: Vec<usize> = std::iter::once("PID".len())
        .chain(columns.iter().map(|c| c.title().chars().count()))
        .collect();

    for row in snapshot.rows() {
        widths[0] = widths[0].max(row.pid.to_string().len());
        for (i, cell) in row.cells.iter().enumerate() {
            if let Some(w) = widths.get_mut(i + 1) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<&str> = std::iter::once("PID")
        .chain(columns.iter().map(|c| c.title()))
        .collect();
    push_line(&mut out, header.iter().copied(), &widths);

    for row in snapshot.rows() {
        let pid = row.pid.to_string();
        let cells = std::iter::once(pid.as_str()).chain(row.cells.iter().map(String::as_str));
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
