/// Lays out rows under headers, padding every column to its widest cell. The last column isn't
/// padded, so long lists of times can run on.
pub fn render_table(headers: Vec<&str>, rows: Vec<Vec<String>>, margin: usize) -> String {
    let mut width_per_col: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (cell, width) in row.iter().zip(width_per_col.iter_mut()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(
        &mut out,
        headers.iter().map(|h| h.to_string()).collect(),
        &width_per_col,
        margin,
    );
    let gaps = width_per_col.len().saturating_sub(1);
    let rule: usize = width_per_col.iter().sum::<usize>() + margin * gaps;
    out.push_str(&"-".repeat(rule));
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, &width_per_col, margin);
    }
    out
}

fn push_row(out: &mut String, row: Vec<String>, width_per_col: &[usize], margin: usize) {
    let last = row.len().saturating_sub(1);
    for (idx, (cell, width)) in row.into_iter().zip(width_per_col).enumerate() {
        if idx == last {
            out.push_str(&cell);
        } else {
            let pad = width - cell.chars().count() + margin;
            out.push_str(&cell);
            out.push_str(&" ".repeat(pad));
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_table() {
        let out = render_table(
            vec!["Stop Name", "Times"],
            vec![
                vec!["Main St".to_string(), "8:00 AM, 8:05 PM".to_string()],
                vec!["College Mall Rd".to_string(), "9:10 AM".to_string()],
            ],
            2,
        );
        let expected = [
            format!("Stop Name{}Times", " ".repeat(8)),
            "-".repeat(33),
            format!("Main St{}8:00 AM, 8:05 PM", " ".repeat(10)),
            "College Mall Rd  9:10 AM".to_string(),
        ];
        assert_eq!(out, format!("{}\n", expected.join("\n")));
    }
}
