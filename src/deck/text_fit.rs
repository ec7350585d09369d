//! Shrink-to-fit text layout.
//!
//! Slides have fixed boxes and no font shaping is available at build time, so glyph advances
//! are estimated: wide (CJK, kana, full-width forms, emoji) code points take 1.0em, everything
//! else 0.55em. Text is wrapped greedily; if it overflows the box height the font shrinks in
//! 0.5pt steps down to a floor, and whatever still overflows is cut with an ellipsis.

use crate::foundation::core::{PT_PER_INCH, Rect};

pub const WIDE_ADVANCE_EM: f64 = 1.0;
pub const NARROW_ADVANCE_EM: f64 = 0.55;
pub const SHRINK_STEP_PT: f64 = 0.5;
pub const ELLIPSIS: char = '…';

/// Result of fitting a string into a box.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedText {
    pub font_pt: f64,
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl FittedText {
    /// Total height in inches at `line_height`.
    pub fn height_in(&self, line_height: f64) -> f64 {
        self.lines.len() as f64 * line_pitch_in(self.font_pt, line_height)
    }
}

fn is_wide(c: char) -> bool {
    matches!(u32::from(c),
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1FAFF
        | 0x20000..=0x3FFFD)
}

/// Estimated advance of `c` in em.
pub fn char_advance_em(c: char) -> f64 {
    if is_wide(c) {
        WIDE_ADVANCE_EM
    } else {
        NARROW_ADVANCE_EM
    }
}

/// Estimated width of `text` in inches at `font_pt`.
pub fn text_width_in(text: &str, font_pt: f64) -> f64 {
    text.chars().map(char_advance_em).sum::<f64>() * font_pt / PT_PER_INCH
}

fn line_pitch_in(font_pt: f64, line_height: f64) -> f64 {
    font_pt / PT_PER_INCH * line_height
}

/// Break units: a wide char, a run of spaces, or a run of other narrow chars (a word).
fn atoms(paragraph: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None::<usize>;
    let mut start_space = false;
    for (i, c) in paragraph.char_indices() {
        if is_wide(c) {
            if let Some(s) = start.take() {
                out.push(&paragraph[s..i]);
            }
            out.push(&paragraph[i..i + c.len_utf8()]);
            continue;
        }
        let space = c == ' ';
        match start {
            Some(s) if space != start_space => {
                out.push(&paragraph[s..i]);
                start = Some(i);
                start_space = space;
            }
            Some(_) => {}
            None => {
                start = Some(i);
                start_space = space;
            }
        }
    }
    if let Some(s) = start {
        out.push(&paragraph[s..]);
    }
    out
}

/// Greedy wrap honoring explicit newlines. Words wider than a line are split by character.
pub fn wrap_lines(text: &str, max_width_in: f64, font_pt: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut line = String::new();
        let mut width = 0.0;
        let mut wrapped = false;
        for atom in atoms(paragraph) {
            let is_space = atom.starts_with(' ');
            if is_space && wrapped && line.is_empty() {
                continue;
            }
            let w = text_width_in(atom, font_pt);
            if width + w <= max_width_in {
                line.push_str(atom);
                width += w;
                continue;
            }
            if is_space {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
                wrapped = true;
                continue;
            }
            if w <= max_width_in {
                lines.push(std::mem::take(&mut line).trim_end().to_string());
                line.push_str(atom);
                width = w;
                wrapped = true;
                continue;
            }
            for c in atom.chars() {
                let cw = char_advance_em(c) * font_pt / PT_PER_INCH;
                if width + cw > max_width_in && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                    wrapped = true;
                }
                line.push(c);
                width += cw;
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Fit `text` into `bounds`, starting at `font_pt` and shrinking no further than `min_pt`.
pub fn fit_text(
    text: &str,
    bounds: Rect,
    font_pt: f64,
    min_pt: f64,
    line_height: f64,
) -> FittedText {
    let min_pt = min_pt.min(font_pt).max(1.0);
    let width = bounds.width().max(0.0);
    let height = bounds.height().max(0.0);

    let mut size = font_pt;
    loop {
        let lines = wrap_lines(text, width, size);
        let pitch = line_pitch_in(size, line_height);
        if lines.len() as f64 * pitch <= height + 1e-9 {
            return FittedText {
                font_pt: size,
                lines,
                truncated: false,
            };
        }
        if size - SHRINK_STEP_PT < min_pt - 1e-9 {
            return truncate(lines, width, height, size, pitch);
        }
        size -= SHRINK_STEP_PT;
    }
}

fn truncate(mut lines: Vec<String>, width: f64, height: f64, size: f64, pitch: f64) -> FittedText {
    let max_lines = ((height + 1e-9) / pitch).floor().max(1.0) as usize;
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let ellipsis_w = text_width_in("…", size);
        while !last.is_empty() && text_width_in(last, size) + ellipsis_w > width {
            last.pop();
        }
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        last.push(ELLIPSIS);
    }
    FittedText {
        font_pt: size,
        lines,
        truncated: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/text_fit.rs"]
mod tests;
