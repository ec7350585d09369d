use crate::{
    foundation::core::{Point, Rect, Size},
    model::scenario::QuadrantId,
};

/// Box of quadrant `q`'s card around `center`, `gutter` away from both center lines.
///
/// y grows downward: A and B sit above the horizontal center line, A and C left of the vertical.
pub fn quadrant_rect(center: Point, card: Size, gutter: f64, q: QuadrantId) -> Rect {
    let x0 = if q.is_left() {
        center.x - card.width - gutter
    } else {
        center.x + gutter
    };
    let y0 = if q.is_top() {
        center.y - card.height - gutter
    } else {
        center.y + gutter
    };
    Rect::new(x0, y0, x0 + card.width, y0 + card.height)
}

/// Four equally sized cards tiling a 2x2 grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadrantLayout {
    pub center: Point,
    pub card: Size,
    pub gutter: f64,
}

impl QuadrantLayout {
    pub fn new(center: Point, card: Size, gutter: f64) -> Self {
        Self {
            center,
            card,
            gutter,
        }
    }

    /// Centered in `bounds`.
    pub fn centered_in(bounds: Rect, card: Size, gutter: f64) -> Self {
        Self::new(bounds.center(), card, gutter)
    }

    pub fn rect(&self, q: QuadrantId) -> Rect {
        quadrant_rect(self.center, self.card, self.gutter, q)
    }

    pub fn rects(&self) -> [(QuadrantId, Rect); 4] {
        QuadrantId::ALL.map(|q| (q, self.rect(q)))
    }

    /// Smallest rect enclosing all four cards.
    pub fn bounds(&self) -> Rect {
        self.rect(QuadrantId::A).union(self.rect(QuadrantId::D))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quadrant.rs"]
mod tests;
