// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering.
/// This is the canvas the content page and every spoiler overlay paint into.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize the backing bitmap. Contents are discarded; the caller
    /// repaints on the next frame anyway.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    /// Clear to a solid color
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        let pixel = u32::from_ne_bytes([255, b, g, r]);

        // Safety: pixels.len() is always divisible by 4 (width * height * 4).
        // write_unaligned avoids assuming alignment of Vec<u8>.
        let ptr = self.pixels.as_mut_ptr() as *mut u32;
        let len = self.pixels.len() / 4;
        for i in 0..len {
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            write_pixel(&mut self.pixels[idx..idx + 4], r, g, b);
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Draw a horizontal line
    /// Optimized: computes starting index once, then increments by 4
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let mut idx = self.pixel_index(start as u32, y as u32);
        let count = (end - start + 1) as usize;
        for _ in 0..count {
            write_pixel(&mut self.pixels[idx..idx + 4], r, g, b);
            idx += 4;
        }
    }

    /// Draw a horizontal line with alpha blending
    pub fn hline_blend(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i32 - 1);
        if start > end {
            return;
        }

        let alpha = a as u16;
        let mut idx = self.pixel_index(start as u32, y as u32);
        let count = (end - start + 1) as usize;
        for _ in 0..count {
            self.pixels[idx] = 255;
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
            idx += 4;
        }
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, r: u8, g: u8, b: u8) {
        for row in 0..h as i32 {
            self.hline(x, x + w as i32 - 1, y + row, r, g, b);
        }
    }

    /// Fill a rectangle with alpha blending (axis-aligned particle squares)
    pub fn fill_rect_blend(&mut self, x: i32, y: i32, w: u32, h: u32, r: u8, g: u8, b: u8, a: u8) {
        for row in 0..h as i32 {
            self.hline_blend(x, x + w as i32 - 1, y + row, r, g, b, a);
        }
    }

    /// Fill a polygon with alpha blending using scanline spans
    /// (rotated particle squares during the scatter transition)
    pub fn fill_polygon_blend(&mut self, vertices: &[(f32, f32)], r: u8, g: u8, b: u8, a: u8) {
        if vertices.len() < 3 {
            return;
        }

        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for (_, y) in vertices {
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }

        let min_y = (min_y as i32).max(0);
        let max_y = (max_y as i32).min(self.height as i32 - 1);

        // Preallocate intersection buffer (reused per scanline)
        let mut intersections = Vec::with_capacity(vertices.len());
        let n = vertices.len();

        for y in min_y..=max_y {
            intersections.clear();
            let yf = y as f32 + 0.5;

            for i in 0..n {
                let (x1, y1) = vertices[i];
                let (x2, y2) = vertices[(i + 1) % n];

                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    let x = x1 + (yf - y1) / (y2 - y1) * (x2 - x1);
                    intersections.push(x as i32);
                }
            }

            intersections.sort_unstable();
            for pair in intersections.chunks_exact(2) {
                self.hline_blend(pair[0], pair[1], y, r, g, b, a);
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_and_get_pixel() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.clear(10, 20, 30);
        assert_eq!(buffer.get_pixel(0, 0), Some((10, 20, 30)));
        assert_eq!(buffer.get_pixel(7, 7), Some((10, 20, 30)));
        assert_eq!(buffer.get_pixel(8, 0), None);
        assert_eq!(buffer.get_pixel(-1, 0), None);
    }

    #[test]
    fn test_fill_rect_blend_clips_to_bounds() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.clear(0, 0, 0);
        // Partially off the top-left corner; must not panic
        buffer.fill_rect_blend(-2, -2, 4, 4, 255, 255, 255, 255);
        assert_eq!(buffer.get_pixel(0, 0), Some((255, 255, 255)));
        assert_eq!(buffer.get_pixel(2, 2), Some((0, 0, 0)));
    }

    #[test]
    fn test_blend_full_alpha_replaces() {
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(0, 0, 0);
        buffer.blend_pixel(1, 1, 200, 100, 50, 255);
        assert_eq!(buffer.get_pixel(1, 1), Some((200, 100, 50)));
    }

    #[test]
    fn test_blend_partial_alpha_mixes() {
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(0, 0, 0);
        buffer.blend_pixel(1, 1, 255, 255, 255, 128);
        let (r, _, _) = buffer.get_pixel(1, 1).unwrap();
        assert!(r > 100 && r < 160);
    }

    #[test]
    fn test_fill_polygon_blend_covers_interior() {
        let mut buffer = PixelBuffer::with_size(16, 16);
        buffer.clear(0, 0, 0);
        let square = [(4.0, 4.0), (12.0, 4.0), (12.0, 12.0), (4.0, 12.0)];
        buffer.fill_polygon_blend(&square, 255, 255, 255, 255);
        assert_eq!(buffer.get_pixel(8, 8), Some((255, 255, 255)));
        assert_eq!(buffer.get_pixel(2, 2), Some((0, 0, 0)));
    }

    #[test]
    fn test_resize_changes_dimensions() {
        let mut buffer = PixelBuffer::with_size(8, 8);
        buffer.resize(16, 4);
        assert_eq!(buffer.width(), 16);
        assert_eq!(buffer.height(), 4);
        assert_eq!(buffer.as_bytes().len(), 16 * 4 * 4);
    }
}
