use crate::geo::CountryCode;

/// Pointer lead offsets in canvas pixels: ahead of and above the cursor.
pub const LEAD_X: i32 = 15;
pub const LEAD_Y: i32 = -10;
/// Gap between pointer and tooltip when flipped to the left side.
const FLIP_GAP: i32 = 10;

/// Compute the tooltip anchor for a pointer position inside a container of
/// the given pixel width. If the tooltip would overflow the container's
/// right edge it flips to the left of the pointer. Vertical overflow is left
/// uncorrected.
pub fn anchor(container_width: i32, pointer: (i32, i32), tooltip_width: i32) -> (i32, i32) {
    let mut x = pointer.0 + LEAD_X;
    let y = pointer.1 + LEAD_Y;
    if x + tooltip_width > container_width {
        x = pointer.0 - tooltip_width - FLIP_GAP;
    }
    (x, y)
}

/// Member count line, if any: no line at zero, singular at exactly one.
pub fn member_count_line(count: usize) -> Option<String> {
    if count == 0 {
        return None;
    }
    Some(format!(
        "{count} member{}",
        if count > 1 { "s" } else { "" }
    ))
}

/// The floating tooltip that follows the pointer over the map.
#[derive(Default)]
pub struct Tooltip {
    visible: bool,
    lines: Vec<String>,
    pos: (i32, i32),
}

impl Tooltip {
    /// Fill in content for a country and make the tooltip visible. `name` is
    /// the display name when the name table has one; the raw code stands in
    /// otherwise.
    pub fn show(&mut self, name: Option<&str>, code: CountryCode, member_count: usize) {
        let mut lines = vec![name.map(str::to_string).unwrap_or_else(|| code.to_string())];
        if let Some(count_line) = member_count_line(member_count) {
            lines.push(count_line);
        }
        self.lines = lines;
        self.visible = true;
    }

    /// Follow the pointer. `container_width` is the map canvas width in
    /// pixels; the pointer position is relative to the same canvas.
    pub fn reposition(&mut self, container_width: i32, pointer: (i32, i32)) {
        self.pos = anchor(container_width, pointer, self.width());
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Anchor position in canvas pixels (may be off-canvas vertically).
    pub fn position(&self) -> (i32, i32) {
        self.pos
    }

    /// Rendered width in canvas pixels: longest line plus a one-cell border
    /// on each side, at two pixels per character cell.
    pub fn width(&self) -> i32 {
        let longest = self
            .lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        (longest as i32 + 2) * 2
    }
}
