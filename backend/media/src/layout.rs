//! Template-relative layout.
//!
//! Positions are derived from the overlay's non-transparent region, so swapping
//! the overlay image is enough to move the album art and text.

use image::RgbaImage;

pub const CANVAS_WIDTH: u32 = 1280;
pub const CANVAS_HEIGHT: u32 = 720;

/// Alpha values above this count as part of the content box.
pub const ALPHA_THRESHOLD: u8 = 20;

const ART_HEIGHT_RATIO: f32 = 0.55;
const ART_INSET_X: u32 = 76;
const ART_BIAS_Y: u32 = 40;
const ART_RADIUS_RATIO: f32 = 0.25;
const TEXT_GAP_X: u32 = 30;
const TITLE_OFFSET_Y: u32 = 10;
const INFO_STEP_RATIO: f32 = 0.33;
const TIME_STEP_RATIO: f32 = 0.28;

/// Half-open pixel rectangle: `x1..x2` by `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rect {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// Bounding box of every pixel whose alpha exceeds [`ALPHA_THRESHOLD`].
/// `None` when the template is fully transparent.
pub fn derive_content_box(overlay: &RgbaImage) -> Option<Rect> {
    let mut bbox: Option<Rect> = None;
    for (x, y, px) in overlay.enumerate_pixels() {
        if px[3] <= ALPHA_THRESHOLD {
            continue;
        }
        bbox = Some(match bbox {
            None => Rect { x1: x, y1: y, x2: x + 1, y2: y + 1 },
            Some(r) => Rect {
                x1: r.x1.min(x),
                y1: r.y1.min(y),
                x2: r.x2.max(x + 1),
                y2: r.y2.max(y + 1),
            },
        });
    }
    bbox
}

/// Where the album art and the three text lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub art_x: u32,
    pub art_y: u32,
    pub art_size: u32,
    pub art_radius: u32,
    pub text_x: u32,
    pub title_y: u32,
    pub info_y: u32,
    pub time_y: u32,
}

impl CardLayout {
    pub fn from_content_box(content: Rect) -> Self {
        let height = content.height();
        let art_size = scale(height, ART_HEIGHT_RATIO);
        let art_x = content.x1 + ART_INSET_X;
        let art_y = content.y1 + (height - art_size) / 2 + ART_BIAS_Y;

        let title_y = art_y + TITLE_OFFSET_Y;
        let info_y = title_y + scale(art_size, INFO_STEP_RATIO);
        let time_y = info_y + scale(art_size, TIME_STEP_RATIO);

        Self {
            art_x,
            art_y,
            art_size,
            art_radius: scale(art_size, ART_RADIUS_RATIO),
            text_x: art_x + art_size + TEXT_GAP_X,
            title_y,
            info_y,
            time_y,
        }
    }
}

/// `value * ratio`, truncated.
fn scale(value: u32, ratio: f32) -> u32 {
    (value as f32 * ratio) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn template_with_box(rect: Rect, alpha: u8) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 0]));
        for y in rect.y1..rect.y2 {
            for x in rect.x1..rect.x2 {
                img.put_pixel(x, y, Rgba([30, 30, 30, alpha]));
            }
        }
        img
    }

    #[test]
    fn content_box_matches_opaque_region() {
        let rect = Rect { x1: 100, y1: 120, x2: 1180, y2: 600 };
        let img = template_with_box(rect, 160);
        assert_eq!(derive_content_box(&img), Some(rect));
    }

    #[test]
    fn faint_pixels_are_ignored() {
        let mut img = template_with_box(Rect { x1: 200, y1: 200, x2: 400, y2: 400 }, 200);
        // A haze at the threshold must not widen the box.
        for x in 0..CANVAS_WIDTH {
            img.put_pixel(x, 0, Rgba([255, 255, 255, ALPHA_THRESHOLD]));
        }
        assert_eq!(
            derive_content_box(&img),
            Some(Rect { x1: 200, y1: 200, x2: 400, y2: 400 })
        );
    }

    #[test]
    fn transparent_template_has_no_box() {
        let img = RgbaImage::from_pixel(64, 36, Rgba([255, 255, 255, 0]));
        assert_eq!(derive_content_box(&img), None);
    }

    #[test]
    fn card_layout_follows_content_box() {
        let layout = CardLayout::from_content_box(Rect { x1: 100, y1: 100, x2: 1180, y2: 600 });
        // height 500 → art 275, centered with a 40px downward bias
        assert_eq!(layout.art_size, 275);
        assert_eq!(layout.art_x, 176);
        assert_eq!(layout.art_y, 100 + 112 + 40);
        assert_eq!(layout.art_radius, 68);
        assert_eq!(layout.text_x, 176 + 275 + 30);
        assert_eq!(layout.title_y, 262);
        assert_eq!(layout.info_y, 262 + 90);
        assert_eq!(layout.time_y, 262 + 90 + 77);
    }

    #[test]
    fn moving_the_box_moves_everything() {
        let a = CardLayout::from_content_box(Rect { x1: 0, y1: 0, x2: 1000, y2: 400 });
        let b = CardLayout::from_content_box(Rect { x1: 50, y1: 30, x2: 1050, y2: 430 });
        assert_eq!(b.art_x - a.art_x, 50);
        assert_eq!(b.art_y - a.art_y, 30);
        assert_eq!(b.time_y - a.time_y, 30);
        assert_eq!(a.art_size, b.art_size);
    }
}
