//! Terminal renderer via crossterm
//!
//! Field pixels are scaled onto the terminal's cell grid. A frame is composed
//! in a [`CellBuffer`] and written out in one pass on `present`.

use std::io::Write;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use super::{RenderError, Renderer, hud};
use crate::assets::{Rgb, Sprite};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::Aabb;

const BAR_EMPTY_GLYPH: char = '░';
const BAR_FILL_GLYPH: char = '█';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgb,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        color: Rgb::WHITE,
    };
}

/// Frame composed in terminal cells
#[derive(Debug, Clone)]
pub struct CellBuffer {
    cols: u16,
    rows: u16,
    /// Cells per field pixel on each axis
    scale: Vec2,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(cols: u16, rows: u16, field: Vec2) -> Self {
        let scale = Vec2::new(
            cols as f32 / field.x.max(1.0),
            rows as f32 / field.y.max(1.0),
        );
        Self {
            cols,
            rows,
            scale,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }

    fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    fn to_cell(&self, pos: Vec2) -> (i32, i32) {
        let scaled = pos * self.scale;
        (scaled.x.floor() as i32, scaled.y.floor() as i32)
    }

    /// Cover every cell the box touches; anything on screen gets at least one cell
    pub fn fill_rect(&mut self, bounds: &Aabb, cell: Cell) {
        let (c0, r0) = self.to_cell(bounds.min);
        let (c1, r1) = self.to_cell(bounds.max);
        for row in r0..=r1.max(r0) {
            for col in c0..=c1.max(c0) {
                // the far edge is exclusive unless the box is thinner than a cell
                let far_col = col == c1 && col > c0 && (bounds.max.x * self.scale.x).fract() == 0.0;
                let far_row = row == r1 && row > r0 && (bounds.max.y * self.scale.y).fract() == 0.0;
                if !far_col && !far_row {
                    self.set(col, row, cell);
                }
            }
        }
    }

    /// Text whose first row is centred on `anchor`
    pub fn put_text(&mut self, text: &str, anchor: Vec2, color: Rgb) {
        let (col, row) = self.to_cell(anchor);
        let len = text.chars().count() as i32;
        let start = col - len / 2;
        for (i, glyph) in text.chars().enumerate() {
            self.set(start + i as i32, row, Cell { glyph, color });
        }
    }

    /// Rows as plain strings (colours dropped)
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1) as usize)
            .map(|row| row.iter().map(|c| c.glyph).collect())
            .collect()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// Renders into the alternate screen of the controlling terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
    field: Vec2,
    buffer: CellBuffer,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Enter raw mode and the alternate screen; undone on drop
    pub fn new(out: W, settings: &Settings) -> Result<Self, RenderError> {
        terminal::enable_raw_mode()?;
        let field = Vec2::new(settings.field_width, settings.field_height);
        // Built before the remaining setup so a failure below still restores the terminal
        let mut renderer = Self {
            out,
            field,
            buffer: CellBuffer::new(0, 0, field),
            keyboard_enhanced: false,
        };
        renderer.out.execute(terminal::EnterAlternateScreen)?;
        renderer.out.execute(cursor::Hide)?;

        // Key-release reporting where the terminal supports it
        renderer.keyboard_enhanced = renderer
            .out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();

        let (cols, rows) = terminal::size()?;
        renderer.buffer = CellBuffer::new(cols, rows, field);
        log::info!(
            "Terminal {}x{} cells, keyboard enhancement: {}",
            cols,
            rows,
            renderer.keyboard_enhanced
        );
        Ok(renderer)
    }

    /// Follow terminal resizes between frames
    fn sync_size(&mut self) {
        if let Ok((cols, rows)) = terminal::size() {
            if cols != self.buffer.cols() || rows != self.buffer.rows() {
                log::debug!("Terminal resized to {}x{}", cols, rows);
                self.buffer = CellBuffer::new(cols, rows, self.field);
            }
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self, background: &Sprite) {
        self.sync_size();
        self.buffer.fill(Cell {
            glyph: background.glyph,
            color: background.color,
        });
    }

    fn draw_sprite(&mut self, sprite: &Sprite, bounds: &Aabb, _rotation_deg: f32) {
        self.buffer.fill_rect(
            bounds,
            Cell {
                glyph: sprite.glyph,
                color: sprite.color,
            },
        );
    }

    fn draw_bar(&mut self, origin: Vec2, ratio: f32, color: Rgb) {
        let size = Vec2::new(BAR_LENGTH, BAR_HEIGHT);
        let empty = Cell {
            glyph: BAR_EMPTY_GLYPH,
            color: Rgb::WHITE,
        };
        self.buffer.fill_rect(
            &Aabb {
                min: origin,
                max: origin + size,
            },
            empty,
        );
        let fill = hud::bar_fill(ratio);
        if fill > 0.0 {
            let filled = Aabb {
                min: origin,
                max: origin + Vec2::new(fill, BAR_HEIGHT),
            };
            self.buffer.fill_rect(
                &filled,
                Cell {
                    glyph: BAR_FILL_GLYPH,
                    color,
                },
            );
        }
    }

    fn draw_text(&mut self, text: &str, _size: u32, anchor: Vec2) {
        self.buffer.put_text(text, anchor, Rgb::WHITE);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let cols = self.buffer.cols();
        for row in 0..self.buffer.rows() {
            self.out.queue(cursor::MoveTo(0, row))?;
            let mut current: Option<Rgb> = None;
            for col in 0..cols {
                let Some(cell) = self.buffer.get(col, row) else {
                    continue;
                };
                if current != Some(cell.color) {
                    self.out.queue(style::SetForegroundColor(to_color(cell.color)))?;
                    current = Some(cell.color);
                }
                self.out.queue(Print(cell.glyph))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
