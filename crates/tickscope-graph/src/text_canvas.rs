//! Character-grid canvas for terminals and tests.
//!
//! Each cell stands for an 8x14 pixel block, so a 12-point line of text
//! with two pixels of spacing occupies exactly one row. Colours map to
//! glyphs: opaque dark fills blank a cell, yellow becomes `#`, faint white
//! becomes `.` and brighter white `:`.

use core::fmt;

use crate::canvas::{Canvas, Colour, Rect};

/// Pixel width of one cell.
pub const CELL_WIDTH: i32 = 8;
/// Pixel height of one cell, equal to one line of text.
pub const CELL_HEIGHT: i32 = 14;

/// A canvas that renders into a grid of characters.
///
/// # Example
///
/// ```rust
/// use tickscope_graph::{Canvas, Colour, Rect, TextCanvas};
///
/// let mut canvas = TextCanvas::new(10, 1);
/// canvas.draw_text("hello", Rect::new(0, 0, 80, 14), Colour::WHITE);
/// assert_eq!(canvas.render(), "hello\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCanvas {
    columns: usize,
    rows: usize,
    cells: Vec<char>,
}

impl TextCanvas {
    /// A blank canvas of `columns` by `rows` cells.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![' '; columns.saturating_mul(rows)],
        }
    }

    /// Number of character columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of character rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Pixel rectangle covered by the canvas.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let to_px = |cells: usize, size: i32| {
            i32::try_from(cells)
                .unwrap_or(i32::MAX)
                .saturating_mul(size)
        };
        Rect::new(
            0,
            0,
            to_px(self.columns, CELL_WIDTH),
            to_px(self.rows, CELL_HEIGHT),
        )
    }

    /// Character at a cell.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        if column >= self.columns {
            return None;
        }
        self.cells
            .get(row.checked_mul(self.columns)?.checked_add(column)?)
            .copied()
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// The grid as text, one line per row with trailing blanks trimmed.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.rows);
        if self.columns == 0 {
            return out;
        }
        for row in self.cells.chunks(self.columns) {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    fn set(&mut self, column: i32, row: i32, glyph: char) {
        let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
            return;
        };
        if column >= self.columns {
            return;
        }
        let Some(index) = row
            .checked_mul(self.columns)
            .and_then(|start| start.checked_add(column))
        else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = glyph;
        }
    }

    /// Cell range touched by the pixel range `start..end`.
    fn cell_range(start: i32, end: i32, size: i32) -> core::ops::Range<i32> {
        if end <= start {
            return 0..0;
        }
        start.div_euclid(size)..(end - 1).div_euclid(size) + 1
    }
}

fn glyph_for(colour: Colour) -> Option<char> {
    if colour.alpha < 0.05 {
        return None;
    }
    if colour.brightness() < 32 {
        return (colour.alpha >= 0.5).then_some(' ');
    }
    if colour.red > 200 && colour.green > 200 && colour.blue < 80 {
        return Some('#');
    }
    Some(if colour.alpha >= 0.25 { ':' } else { '.' })
}

impl Canvas for TextCanvas {
    fn fill_rect(&mut self, rect: Rect, colour: Colour) {
        let Some(glyph) = glyph_for(colour) else {
            return;
        };
        for row in Self::cell_range(rect.y, rect.bottom(), CELL_HEIGHT) {
            for column in Self::cell_range(rect.x, rect.right(), CELL_WIDTH) {
                self.set(column, row, glyph);
            }
        }
    }

    fn draw_vertical_line(&mut self, x: i32, top: i32, bottom: i32, colour: Colour) {
        let Some(glyph) = glyph_for(colour) else {
            return;
        };
        let column = x.div_euclid(CELL_WIDTH);
        for row in Self::cell_range(top, bottom, CELL_HEIGHT) {
            // Several grid lines can share a cell; the brighter one stays.
            let shown = usize::try_from(column)
                .ok()
                .zip(usize::try_from(row).ok())
                .and_then(|(c, r)| self.cell(c, r));
            if glyph == '.' && shown == Some(':') {
                continue;
            }
            self.set(column, row, glyph);
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "canvas widths are small"
    )]
    fn fill_horizontal_gradient(&mut self, rect: Rect, left: Colour, right: Colour) {
        if rect.is_empty() {
            return;
        }
        for column in Self::cell_range(rect.x, rect.right(), CELL_WIDTH) {
            let centre = column * CELL_WIDTH + CELL_WIDTH / 2;
            let t = (centre - rect.x) as f32 / rect.width as f32;
            let Some(glyph) = glyph_for(left.lerp(right, t)) else {
                continue;
            };
            for row in Self::cell_range(rect.y, rect.bottom(), CELL_HEIGHT) {
                self.set(column, row, glyph);
            }
        }
    }

    fn draw_rect_outline(&mut self, rect: Rect, colour: Colour) {
        if rect.is_empty() || glyph_for(colour).is_none() {
            return;
        }
        let columns = Self::cell_range(rect.x, rect.right(), CELL_WIDTH);
        let rows = Self::cell_range(rect.y, rect.bottom(), CELL_HEIGHT);
        let (left, right) = (columns.start, columns.end - 1);
        let (top, bottom) = (rows.start, rows.end - 1);

        for column in columns {
            self.set(column, top, '-');
            self.set(column, bottom, '-');
        }
        for row in rows {
            self.set(left, row, '|');
            self.set(right, row, '|');
        }
        for (column, row) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            self.set(column, row, '+');
        }
    }

    fn draw_text(&mut self, text: &str, rect: Rect, colour: Colour) {
        if rect.is_empty() || colour.alpha < 0.05 {
            return;
        }
        // Text starts on the first whole cell inside the rectangle.
        let row = (rect.y + CELL_HEIGHT - 1).div_euclid(CELL_HEIGHT);
        let first = (rect.x + CELL_WIDTH - 1).div_euclid(CELL_WIDTH);
        let end = rect.right().div_euclid(CELL_WIDTH);
        for (column, ch) in (first..end).zip(text.chars()) {
            self.set(column, row, ch);
        }
    }

    fn line_height(&self) -> i32 {
        CELL_HEIGHT
    }

    fn char_width(&self) -> i32 {
        CELL_WIDTH
    }
}

impl fmt::Display for TextCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
