//! Content model and demo layout
//!
//! The overlay engine only ever sees rectangles and a spoiler flag; this
//! module is the minimal content renderer that produces them. A `Page` is a
//! list of text blocks (spans individually flaggable as spoiler) and image
//! rows (each image flaggable). `layout()` flows a page for the current
//! window width, which is what makes marker boxes move on resize and
//! exercises remeasurement.
//!
//! Text renders as greeked bars, one per word; a wrapped spoiler span
//! therefore yields one marker box per visual line, the multi-rect case
//! the geometry tracker unions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::geometry::{MarkerSource, Rect, SpoilerKind};

const MARGIN: f32 = 24.0;
const LINE_HEIGHT: f32 = 22.0;
const BAR_HEIGHT: f32 = 12.0;
const CHAR_WIDTH: f32 = 7.0;
const WORD_GAP: f32 = 7.0;
const BLOCK_GAP: f32 = 18.0;
const IMAGE_GAP: f32 = 8.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub spoiler: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub spoiler: bool,
    #[serde(default = "default_image_color")]
    pub color: [u8; 3],
}

fn default_image_color() -> [u8; 3] {
    [70, 90, 120]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text { spans: Vec<Span> },
    ImageRow { images: Vec<Image> },
}

/// A content page, loaded from JSON the same way scenes are elsewhere
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Built-in page used when no page.json is present
    pub fn demo() -> Self {
        let text = |s: &str, spoiler| Span {
            text: s.to_string(),
            spoiler,
        };
        Self {
            title: "shroud demo".to_string(),
            blocks: vec![
                Block::Text {
                    spans: vec![
                        text("The investigation takes a sharp turn in the finale when", false),
                        text("the detective discovers the culprit was the lighthouse keeper all along", true),
                        text("which recontextualizes every earlier chapter.", false),
                    ],
                },
                Block::ImageRow {
                    images: vec![
                        Image {
                            width: 320.0,
                            height: 200.0,
                            spoiler: true,
                            color: [140, 60, 60],
                        },
                        Image {
                            width: 320.0,
                            height: 200.0,
                            spoiler: true,
                            color: [60, 120, 80],
                        },
                    ],
                },
                Block::Text {
                    spans: vec![text(
                        "This closing paragraph is ordinary text with nothing to hide.",
                        false,
                    )],
                },
            ],
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// One drawable piece of laid-out content
#[derive(Debug, Clone)]
pub struct Fragment {
    pub rect: Rect,
    pub color: (u8, u8, u8),
    pub spoiler: bool,
}

/// A laid-out block: its drawable fragments plus the marker boxes of its
/// spoiler-flagged pieces. Implements `MarkerSource` so an overlay can
/// remeasure straight off it after a reflow.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    pub fragments: Vec<Fragment>,
    pub kind: SpoilerKind,
    markers: Vec<Rect>,
}

impl BlockLayout {
    pub fn has_spoiler(&self) -> bool {
        !self.markers.is_empty()
    }
}

impl MarkerSource for BlockLayout {
    fn marker_rects(&self) -> Vec<Rect> {
        self.markers.clone()
    }
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    pub blocks: Vec<BlockLayout>,
    pub content_height: f32,
}

/// Flow a page for the given canvas width. Deterministic: the same page
/// and width always produce the same boxes.
pub fn layout(page: &Page, width: u32) -> PageLayout {
    let avail = (width as f32 - 2.0 * MARGIN).max(CHAR_WIDTH);
    let mut y = MARGIN + LINE_HEIGHT; // leave a title line at the top
    let mut blocks = Vec::with_capacity(page.blocks.len());

    for block in &page.blocks {
        let laid = match block {
            Block::Text { spans } => layout_text(spans, avail, &mut y),
            Block::ImageRow { images } => layout_image_row(images, avail, &mut y),
        };
        y += BLOCK_GAP;
        blocks.push(laid);
    }

    PageLayout {
        blocks,
        content_height: y,
    }
}

fn layout_text(spans: &[Span], avail: f32, y: &mut f32) -> BlockLayout {
    let mut fragments = Vec::new();
    let mut markers = Vec::new();
    let mut x = MARGIN;
    let mut line_top = *y;

    for span in spans {
        let color = if span.spoiler {
            (235, 215, 140)
        } else {
            (200, 200, 208)
        };
        for word in span.text.split_whitespace() {
            let w = (word.chars().count() as f32 * CHAR_WIDTH).min(avail);
            if x + w > MARGIN + avail && x > MARGIN {
                x = MARGIN;
                line_top += LINE_HEIGHT;
            }
            let rect = Rect::new(x, line_top + (LINE_HEIGHT - BAR_HEIGHT) / 2.0, w, BAR_HEIGHT);
            if span.spoiler {
                markers.push(rect);
            }
            fragments.push(Fragment {
                rect,
                color,
                spoiler: span.spoiler,
            });
            x += w + WORD_GAP;
        }
    }

    *y = line_top + LINE_HEIGHT;
    BlockLayout {
        fragments,
        kind: SpoilerKind::Text,
        markers,
    }
}

fn layout_image_row(images: &[Image], avail: f32, y: &mut f32) -> BlockLayout {
    let mut fragments = Vec::new();
    let mut markers = Vec::new();

    let gaps = IMAGE_GAP * images.len().saturating_sub(1) as f32;
    let natural: f32 = images.iter().map(|i| i.width).sum();
    let scale = if natural + gaps > avail && natural > 0.0 {
        ((avail - gaps) / natural).max(0.05)
    } else {
        1.0
    };

    let mut x = MARGIN;
    let mut row_height = 0.0f32;
    for image in images {
        let w = image.width * scale;
        let h = image.height * scale;
        let rect = Rect::new(x, *y, w, h);
        if image.spoiler {
            markers.push(rect);
        }
        fragments.push(Fragment {
            rect,
            color: (image.color[0], image.color[1], image.color[2]),
            spoiler: image.spoiler,
        });
        x += w + IMAGE_GAP;
        row_height = row_height.max(h);
    }

    *y += row_height;
    BlockLayout {
        fragments,
        kind: SpoilerKind::Image,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::measure_regions;

    #[test]
    fn test_spoiler_flag_defaults_to_false() {
        let page: Page = serde_json::from_str(
            r#"{
                "title": "t",
                "blocks": [
                    {"type": "text", "spans": [{"text": "plain"}]},
                    {"type": "image_row", "images": [{"width": 100.0, "height": 80.0}]}
                ]
            }"#,
        )
        .unwrap();
        match &page.blocks[0] {
            Block::Text { spans } => assert!(!spans[0].spoiler),
            _ => panic!("expected text block"),
        }
        match &page.blocks[1] {
            Block::ImageRow { images } => assert!(!images[0].spoiler),
            _ => panic!("expected image row"),
        }
    }

    #[test]
    fn test_page_json_round_trip() {
        let page = Page::demo();
        let json = serde_json::to_string(&page).unwrap();
        let back: Page = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blocks.len(), page.blocks.len());
        assert_eq!(back.title, page.title);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let page = Page::demo();
        let a = layout(&page, 800);
        let b = layout(&page, 800);
        for (ba, bb) in a.blocks.iter().zip(&b.blocks) {
            assert_eq!(ba.marker_rects(), bb.marker_rects());
        }
    }

    #[test]
    fn test_only_flagged_spans_produce_markers() {
        let page = Page::demo();
        let laid = layout(&page, 800);
        assert!(laid.blocks[0].has_spoiler());
        assert!(laid.blocks[1].has_spoiler());
        assert!(!laid.blocks[2].has_spoiler());
    }

    #[test]
    fn test_narrow_layout_wraps_spoiler_across_lines() {
        let page = Page::demo();
        let laid = layout(&page, 320);
        let markers = laid.blocks[0].marker_rects();
        // The flagged span no longer fits one line: markers on several tops
        let mut tops: Vec<i32> = markers.iter().map(|r| r.top as i32).collect();
        tops.dedup();
        assert!(tops.len() > 1);

        // Union still covers every marker
        let regions = measure_regions(&laid.blocks[0], SpoilerKind::Text);
        assert_eq!(regions.len(), 1);
        for m in &markers {
            assert!(regions[0].left <= m.left && regions[0].right() >= m.right());
            assert!(regions[0].top <= m.top && regions[0].bottom() >= m.bottom());
        }
    }

    #[test]
    fn test_image_row_scales_to_fit() {
        let page = Page::demo();
        let laid = layout(&page, 400);
        let markers = laid.blocks[1].marker_rects();
        assert_eq!(markers.len(), 2);
        for m in &markers {
            assert!(m.right() <= 400.0 - MARGIN + 0.5);
        }
        // Images stay separate regions, never unioned
        let regions = measure_regions(&laid.blocks[1], SpoilerKind::Image);
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_reflow_moves_markers() {
        let page = Page::demo();
        let wide = layout(&page, 1200);
        let narrow = layout(&page, 360);
        assert_ne!(
            wide.blocks[0].marker_rects(),
            narrow.blocks[0].marker_rects()
        );
    }
}
