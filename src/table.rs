//! Plain text tables for audit files

use serde_json::Value;

/// Column separator
const SEPARATOR: &str = "  ";

/// Extra width reserved next to each header
const MIN_PADDING: usize = 2;

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

/// Render `rows` under `headers`
///
/// Rows shorter than the header are padded with empty cells and cells
/// beyond the header get an empty header, so any input renders. Columns
/// whose cells are all numeric are right aligned. Lines carry no trailing
/// whitespace.
pub fn tabulate<H: AsRef<str>>(rows: &[Vec<Value>], headers: &[H]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    if columns == 0 {
        return String::new();
    }

    let header_cells: Vec<String> = (0..columns)
        .map(|i| headers.get(i).map(|h| h.as_ref().to_string()).unwrap_or_default())
        .collect();

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|i| row.get(i).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    let numeric: Vec<bool> = (0..columns)
        .map(|i| {
            let mut present = rows
                .iter()
                .filter_map(|row| row.get(i))
                .filter(|v| !v.is_null())
                .peekable();
            present.peek().is_some() && present.all(is_numeric)
        })
        .collect();

    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            let header_width = header_cells[i].chars().count() + MIN_PADDING;
            body.iter()
                .map(|row| row[i].chars().count())
                .fold(header_width, usize::max)
        })
        .collect();

    let render_line = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i], numeric[i]))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(render_line(&header_cells));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(SEPARATOR),
    );
    for row in &body {
        lines.push(render_line(row));
    }

    lines.join("\n")
}
