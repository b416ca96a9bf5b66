use board_core::{BoardViewModel, RowView, Trend};

pub const CELL_WIDTH: usize = 40;
const COUNT_WIDTH: usize = 6;

/// Renders the board as text lines, `num_cols` cells per line, highest
/// count first.
pub fn render_board(board: &BoardViewModel, num_cols: usize) -> Vec<String> {
    let num_cols = num_cols.max(1);
    let header = match board.applied_cycle {
        Some(seq) => format!("Top pages | cycle {} | {} shown", seq, board.rows.len()),
        None => "Top pages | waiting for first cycle".to_string(),
    };

    let mut lines = vec![header];
    for (chunk_index, chunk) in board.rows.chunks(num_cols).enumerate() {
        let line = chunk
            .iter()
            .enumerate()
            .map(|(offset, row)| format_cell(chunk_index * num_cols + offset + 1, row))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(line.trim_end().to_string());
    }
    lines
}

pub fn format_cell(rank: usize, row: &RowView) -> String {
    let prefix = format!(
        "{:>2}. {} {:>width$} ",
        rank,
        trend_marker(row.trend),
        format_with_commas(row.displayed),
        width = COUNT_WIDTH
    );
    let room = CELL_WIDTH.saturating_sub(prefix.chars().count());
    format!("{prefix}{:<room$}", truncate(&row.title, room), room = room)
}

pub fn trend_marker(trend: Option<Trend>) -> char {
    match trend {
        Some(Trend::Up) => '^',
        Some(Trend::Down) => 'v',
        None => ' ',
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn format_with_commas(value: u64) -> String {
    let s = value.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::{CycleSeq, ViewId};

    fn row(title: &str, displayed: u64, trend: Option<Trend>) -> RowView {
        RowView {
            view: ViewId(0),
            path: format!("/{title}.html"),
            title: title.to_string(),
            thumbnail_url: String::new(),
            count: displayed,
            displayed,
            trend,
        }
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1234567), "1,234,567");
    }

    #[test]
    fn cells_have_fixed_width_and_trend() {
        let cell = format_cell(1, &row("A very long talk title that keeps going on", 1200, Some(Trend::Up)));
        assert_eq!(cell.chars().count(), CELL_WIDTH);
        assert!(cell.starts_with(" 1. ^  1,200 "));
        assert!(cell.ends_with('~'));
    }

    #[test]
    fn board_wraps_into_columns_in_rank_order() {
        let board = BoardViewModel {
            applied_cycle: Some(CycleSeq(3)),
            rows: vec![
                row("a", 30, None),
                row("b", 20, Some(Trend::Down)),
                row("c", 10, None),
            ],
            dirty: false,
        };

        let lines = render_board(&board, 2);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Top pages | cycle 3 | 3 shown");
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains(" 2. v"));
        assert!(lines[2].starts_with(" 3."));
    }
}
