//! Word-cloud rendering: frequency table in, PNG out.
//!
//! Layout is the usual archimedean-spiral walk: each word starts at a
//! random angle near the center and spirals outward until its bounding box
//! stops overlapping everything placed before it. Glyphs come from the
//! compiled-in 8x8 bitmap font, scaled nearest-neighbour, so no font files
//! ship with the binary.

use std::f32::consts::TAU;
use std::fs;
use std::path::Path;

use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};
use rand::Rng;
use tracing::{debug, info};

use crate::error::Result;
use crate::freq::FrequencyTable;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 400;
const MAX_WORDS: usize = 100;
const GLYPH: f32 = 8.0;
const MIN_SCALE: f32 = 0.9;
const MAX_SCALE: f32 = 5.0;

/// Viridis-like palette, cycled by rank.
const PALETTE: [[u8; 3]; 8] = [
    [68, 1, 84],
    [70, 50, 127],
    [54, 92, 141],
    [39, 127, 142],
    [31, 161, 135],
    [74, 194, 109],
    [159, 218, 58],
    [253, 231, 37],
];

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TITLE_COLOR: [u8; 3] = [60, 60, 60];

/// Render up to the 100 most frequent entries into a PNG at `path`,
/// creating the parent directory if needed. An empty table writes nothing
/// and returns `Ok(false)`.
pub fn render(table: &FrequencyTable, path: &Path, title: Option<&str>) -> Result<bool> {
    if table.is_empty() {
        info!(path = %path.display(), "nothing to visualize");
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let entries = table.most_common(MAX_WORDS);
    let max_count = entries[0].1 as f32;

    let mut img = RgbaImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let mut placed: Vec<Rect> = Vec::new();
    let mut rng = rand::rng();

    if let Some(title) = title {
        let scale = 1.5;
        let (w, h) = text_size(title, scale);
        let x = (WIDTH.saturating_sub(w) / 2) as i32;
        draw_text(&mut img, title, x, 6, scale, TITLE_COLOR);
        placed.push(Rect { x, y: 0, w, h: h + 12 });
    }

    for (rank, (word, count)) in entries.iter().enumerate() {
        let scale = scale_for(*count as f32 / max_count);
        let (w, h) = text_size(word, scale);
        let Some((x, y)) = place(&mut rng, &placed, w, h) else {
            debug!(word = %word, "no room left, skipping");
            continue;
        };
        draw_text(&mut img, word, x, y, scale, PALETTE[rank % PALETTE.len()]);
        placed.push(Rect { x, y, w, h });
    }

    img.save(path)?;
    info!(path = %path.display(), words = placed.len(), "word cloud written");
    Ok(true)
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
}

impl Rect {
    /// Overlap test with a 2px pad so words do not touch.
    fn intersects(&self, other: &Rect) -> bool {
        let pad = 2;
        self.x - pad < other.x + other.w as i32
            && other.x - pad < self.x + self.w as i32
            && self.y - pad < other.y + other.h as i32
            && other.y - pad < self.y + self.h as i32
    }
}

/// Glyph scale for a relative frequency in (0, 1]. Square-root damping
/// keeps runaway top words from swallowing the canvas.
fn scale_for(relative: f32) -> f32 {
    MIN_SCALE + relative.sqrt() * (MAX_SCALE - MIN_SCALE)
}

fn text_size(text: &str, scale: f32) -> (u32, u32) {
    let cols = text.chars().count() as f32;
    ((cols * GLYPH * scale) as u32, (GLYPH * scale) as u32)
}

/// Spiral outward from the canvas center until the box fits on-canvas and
/// clear of everything already placed.
fn place(rng: &mut impl Rng, placed: &[Rect], w: u32, h: u32) -> Option<(i32, i32)> {
    let cx = WIDTH as f32 / 2.0;
    let cy = HEIGHT as f32 / 2.0;
    let start = rng.random_range(0.0..TAU);
    for step in 0..3000 {
        let theta = start + step as f32 * 0.3;
        let radius = step as f32 * 0.12;
        let x = (cx + radius * theta.cos() - w as f32 / 2.0) as i32;
        let y = (cy + radius * theta.sin() * 0.5 - h as f32 / 2.0) as i32;
        if x < 0 || y < 0 || x as u32 + w > WIDTH || y as u32 + h > HEIGHT {
            continue;
        }
        let candidate = Rect { x, y, w, h };
        if placed.iter().all(|r| !candidate.intersects(r)) {
            return Some((x, y));
        }
    }
    None
}

/// Draw `text` with its top-left corner at (x, y). The bitmap font covers
/// ASCII; anything outside renders as a blank cell.
fn draw_text(img: &mut RgbaImage, text: &str, x: i32, y: i32, scale: f32, color: [u8; 3]) {
    let cell = (GLYPH * scale) as u32;
    let pixel = Rgba([color[0], color[1], color[2], 255]);
    for (col, ch) in text.chars().enumerate() {
        let index = ch as usize;
        if index >= BASIC_LEGACY.len() {
            continue;
        }
        let glyph = BASIC_LEGACY[index];
        let origin_x = x + (col as u32 * cell) as i32;
        for ty in 0..cell {
            let row = glyph[((ty as f32 / scale) as usize).min(7)];
            for tx in 0..cell {
                let bit = ((tx as f32 / scale) as usize).min(7);
                if row >> bit & 1 == 0 {
                    continue;
                }
                let px = origin_x + tx as i32;
                let py = y + ty as i32;
                if px >= 0 && py >= 0 && (px as u32) < WIDTH && (py as u32) < HEIGHT {
                    img.put_pixel(px as u32, py as u32, pixel);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_table_writes_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        let written = render(&FrequencyTable::new(), &path, None).unwrap();
        assert!(!written);
        assert!(!path.exists());
    }

    #[test]
    fn non_empty_table_writes_decodable_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clouds/out.png");

        let mut table = FrequencyTable::new();
        for (word, n) in [("redemption", 9), ("prison", 5), ("hope", 3), ("escape", 1)] {
            for _ in 0..n {
                table.add(word);
            }
        }
        let written = render(&table, &path, Some("Plot keywords")).unwrap();
        assert!(written);

        let decoded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (WIDTH, HEIGHT));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/cloud.png");
        let table: FrequencyTable = ["drama", "drama", "crime"].into_iter().collect();
        assert!(render(&table, &path, None).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn rects_detect_overlap() {
        let a = Rect { x: 10, y: 10, w: 20, h: 10 };
        let b = Rect { x: 25, y: 15, w: 20, h: 10 };
        let c = Rect { x: 100, y: 100, w: 5, h: 5 };
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
