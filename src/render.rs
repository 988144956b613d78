use crate::types::{Placement, Rect};

const MAX_COLS: f64 = 80.0;
const MAX_ROWS: f64 = 40.0;

/// Character grid the layouts are drawn on. Edges that cross become `+`.
struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cells: vec![vec![' '; cols + 1]; rows + 1],
        }
    }

    fn put_edge(&mut self, x: usize, y: usize, edge: char) {
        let Some(cell) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) else {
            return;
        };
        *cell = match (*cell, edge) {
            ('+', _) => '+',
            ('-', '|') | ('|', '-') => '+',
            _ => edge,
        };
    }

    fn outline(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for i in x..=x + w {
            self.put_edge(i, y, '-');
            self.put_edge(i, y + h, '-');
        }
        for j in y..=y + h {
            self.put_edge(x, j, '|');
            self.put_edge(x + w, j, '|');
        }
        for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
            if let Some(cell) = self.cells.get_mut(cy).and_then(|row| row.get_mut(cx)) {
                *cell = '+';
            }
        }
    }

    /// Writes `text` centred inside the box, clipped to its interior.
    fn label(&mut self, x: usize, y: usize, w: usize, h: usize, text: &str) {
        if w <= 2 || h == 0 {
            return;
        }
        let chars: Vec<char> = text.chars().collect();
        let cy = y + h / 2;
        let start = (x + w / 2).saturating_sub(chars.len() / 2);
        for (i, ch) in chars.into_iter().enumerate() {
            let cx = start + i;
            if cx > x
                && cx < x + w
                && cy > y
                && cy < y + h
                && let Some(cell) = self.cells.get_mut(cy).and_then(|row| row.get_mut(cx))
            {
                *cell = ch;
            }
        }
    }

    fn into_string(self) -> String {
        let mut out = String::new();
        for row in self.cells {
            let line: String = row.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Draws a pallet footprint and the boxes placed on it, scaled to fit a
/// terminal. Labelled placements show their label before the size.
pub fn render_layout(footprint: Rect, placements: &[Placement]) -> String {
    if footprint.length == 0 || footprint.width == 0 {
        return String::new();
    }

    let scale = f64::min(
        MAX_COLS / footprint.length as f64,
        MAX_ROWS / footprint.width as f64,
    );
    let to_cells = |mm: u32| (mm as f64 * scale).round() as usize;

    let cols = to_cells(footprint.length);
    let rows = to_cells(footprint.width);
    if cols == 0 || rows == 0 {
        return String::new();
    }

    let mut canvas = Canvas::new(cols, rows);
    canvas.outline(0, 0, cols, rows);

    for p in placements {
        let (x, y) = (to_cells(p.x), to_cells(p.y));
        let (w, h) = (to_cells(p.rect.length), to_cells(p.rect.width));
        if w == 0 || h == 0 {
            continue;
        }
        canvas.outline(x, y, w, h);
        let text = match p.label {
            Some(label) => format!("{} {}", label, p.rect),
            None => p.rect.to_string(),
        };
        canvas.label(x, y, w, h, &text);
    }

    canvas.into_string()
}
