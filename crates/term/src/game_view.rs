//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{palette, Cell, CellStyle, FrameBuffer, Rgb, EMPTY_COLOR};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const TEXT: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const LABEL: CellStyle = TEXT.bold();
const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
const GRID_DOT: CellStyle = CellStyle::new(Rgb::new(90, 90, 100), EMPTY_COLOR).dim();

/// Terminal renderer for one environment session.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let frame_w = (BOARD_WIDTH as u16) * self.cell_w + 2;
        let frame_h = (BOARD_HEIGHT as u16) * self.cell_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w + PANEL_WIDTH) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        self.draw_border(fb, start_x, start_y, frame_w, frame_h);

        // The observation already carries the active piece (and drops it once terminated).
        let grid = snap.observation();
        for (y, row) in grid.iter().enumerate() {
            for (x, &color_id) in row.iter().enumerate() {
                let (ch, style) = if color_id == 0 {
                    ('·', GRID_DOT)
                } else {
                    ('█', CellStyle::new(palette(color_id), EMPTY_COLOR).bold())
                };
                let px = start_x + 1 + (x as u16) * self.cell_w;
                let py = start_y + 1 + (y as u16) * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        if snap.terminated {
            let mid_y = start_y + frame_h / 2;
            self.draw_centered(fb, start_x, mid_y, frame_w, "GAME OVER", LABEL);
            self.draw_centered(fb, start_x, mid_y + 1, frame_w, "r: restart", TEXT);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let (right, bottom) = (x + w - 1, y + h - 1);
        fb.put_char(x, y, '┌', BORDER);
        fb.put_char(right, y, '┐', BORDER);
        fb.put_char(x, bottom, '└', BORDER);
        fb.put_char(right, bottom, '┘', BORDER);
        fb.fill_rect(x + 1, y, w - 2, 1, '─', BORDER);
        fb.fill_rect(x + 1, bottom, w - 2, 1, '─', BORDER);
        fb.fill_rect(x, y + 1, 1, h - 2, '│', BORDER);
        fb.fill_rect(right, y + 1, 1, h - 2, '│', BORDER);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        x: u16,
        y: u16,
    ) {
        if x.saturating_add(PANEL_WIDTH) > viewport.width {
            return;
        }

        let rows = [
            ("SCORE", format!("{:.1}", snap.info.score)),
            ("LAST", format!("{:+.1}", snap.last_reward)),
            ("LINES", snap.info.lines.to_string()),
            ("PIECES", snap.info.pieces.to_string()),
            ("EPISODE", snap.info.episode.to_string()),
            (
                "NEXT",
                snap.next.map_or("-", |k| k.as_str()).to_string(),
            ),
        ];

        let mut cy = y;
        for (label, value) in rows.iter() {
            fb.put_str(x, cy, label, LABEL);
            fb.put_str(x, cy + 1, value, TEXT);
            cy += 3;
        }

        let help = TEXT.dim();
        for line in ["←/→ move", "↑ rotate", "space drop", "q quit"] {
            fb.put_str(x, cy, line, help);
            cy += 1;
        }
    }

    fn draw_centered(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, text: &str, style: CellStyle) {
        let text_w = text.chars().count() as u16;
        fb.put_str(x + w.saturating_sub(text_w) / 2, y, text, style);
    }
}

/// Columns reserved to the right of the board.
const PANEL_WIDTH: u16 = 14;
