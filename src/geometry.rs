//! Region geometry for spoiler overlays
//!
//! A spoiler covers one or more axis-aligned rectangles measured from the
//! rendered content. Text spoilers wrap across lines and are covered as a
//! single bounding union; image-row spoilers keep one region per image.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in coordinates relative to a stable container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Geometric center (cx, cy)
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Bounding union of two rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Bounding union of a rect list, None if empty
    pub fn union_all(rects: &[Rect]) -> Option<Rect> {
        let mut iter = rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(r)))
    }

    /// Translate by (dx, dy)
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// What kind of content a spoiler covers. Decides how measured marker
/// boxes are merged and which particle density the overlay uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoilerKind {
    Text,
    Image,
}

/// Capability handle for measuring marker boxes out of rendered content.
///
/// Keeps the animation modules independent of any particular renderer:
/// the demo's layout implements this, tests use a plain Vec.
pub trait MarkerSource {
    /// Bounding boxes of the spoiler-flagged markers, relative to the
    /// container the overlay draws in
    fn marker_rects(&self) -> Vec<Rect>;
}

impl MarkerSource for Vec<Rect> {
    fn marker_rects(&self) -> Vec<Rect> {
        self.clone()
    }
}

/// Measure the regions a spoiler must cover.
///
/// Text markers (one client box per wrapped line) merge into a single
/// bounding rectangle so the spoiler reads as one continuous cover.
/// Image markers each keep their own region and click target.
///
/// Zero markers means nothing to cover: returns an empty list and the
/// caller renders no overlay (fail open, never an error).
pub fn measure_regions(source: &dyn MarkerSource, kind: SpoilerKind) -> Vec<Rect> {
    let markers = source.marker_rects();
    match kind {
        SpoilerKind::Text => Rect::union_all(&markers).into_iter().collect(),
        SpoilerKind::Image => markers,
    }
}
