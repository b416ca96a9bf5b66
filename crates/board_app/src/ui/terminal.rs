use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use board_core::{BoardViewModel, MergedPageRecord, OverlayRequest, Trend, ViewId};
use board_logging::{board_debug, board_error, board_info};

use super::render::render_board;
use super::Presenter;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws the board to a text stream and writes overlays to an HTML file.
pub struct TerminalPresenter<W: Write> {
    out: W,
    num_cols: usize,
    overlay_path: PathBuf,
    clear_screen: bool,
    fresh: BTreeSet<ViewId>,
    needs_render: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, num_cols: usize, overlay_path: PathBuf) -> Self {
        Self {
            out,
            num_cols,
            overlay_path,
            clear_screen: true,
            fresh: BTreeSet::new(),
            needs_render: false,
        }
    }

    pub fn without_clear_screen(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_out(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            board_error!("Failed to write to terminal: {}", err);
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn insert(&mut self, view: ViewId, record: &MergedPageRecord) {
        board_debug!("insert {} {} ({})", view, record.path, record.visitor_count);
        self.fresh.insert(view);
    }

    fn animate_count(&mut self, view: ViewId, from: u64, to: u64, trend: Trend) {
        board_debug!("animate {} {} -> {} ({:?})", view, from, to, trend);
    }

    fn show_count(&mut self, _view: ViewId, _value: u64) {
        self.needs_render = true;
    }

    fn detach(&mut self, view: ViewId) {
        board_debug!("detach {}", view);
        self.fresh.remove(&view);
    }

    fn relayout(&mut self, _board: &BoardViewModel) {
        self.needs_render = true;
    }

    /// Redraws the board. Newly inserted rows are listed under the grid once.
    fn render(&mut self, board: &BoardViewModel) {
        let mut text = String::new();
        if self.clear_screen {
            text.push_str(CLEAR_SCREEN);
        }
        for line in render_board(board, self.num_cols) {
            text.push_str(&line);
            text.push('\n');
        }
        if !self.fresh.is_empty() {
            let titles: Vec<&str> = board
                .rows
                .iter()
                .filter(|row| self.fresh.contains(&row.view))
                .map(|row| row.title.as_str())
                .collect();
            if !titles.is_empty() {
                text.push_str(&format!("new: {}\n", titles.join(", ")));
            }
            self.fresh.clear();
        }
        self.needs_render = false;

        self.write_out(&text);
    }

    fn needs_render(&self) -> bool {
        self.needs_render
    }

    fn open_overlay(&mut self, request: &OverlayRequest) {
        match fs::write(&self.overlay_path, request.render_html()) {
            Ok(()) => {
                board_info!("Overlay for {} written to {:?}", request.path, self.overlay_path);
                let note = format!(
                    "overlay: {} -> {}\n",
                    request.title,
                    self.overlay_path.display()
                );
                self.write_out(&note);
            }
            Err(err) => {
                board_error!("Failed to write overlay {:?}: {}", self.overlay_path, err);
            }
        }
    }
}
