//! Pixel work: scaling, the dimmed background, the rounded album art, and text.

use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::error::ThumbnailError;
use crate::layout::{derive_content_box, CardLayout, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::text::{fit_font_size, ThumbnailCard, TITLE_MAX_SIZE, TITLE_MAX_WIDTH, TITLE_MIN_SIZE};

const BLUR_SIGMA: f32 = 5.0;
const BRIGHTNESS: f32 = 0.3;

const INFO_SIZE: f32 = 22.0;
const TIME_SIZE: f32 = 26.0;
const WATERMARK_SIZE: f32 = 24.0;
const WATERMARK_INSET: u32 = 25;

const TITLE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DETAIL_COLOR: Rgba<u8> = Rgba([200, 200, 200, 255]);
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 180]);
const WATERMARK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 240]);

pub struct Fonts {
    pub title: FontVec,
    pub body: FontVec,
}

impl Fonts {
    pub fn from_bytes(title: Vec<u8>, body: Vec<u8>) -> Result<Self, ThumbnailError> {
        let parse = |bytes: Vec<u8>, which: &str| {
            FontVec::try_from_vec(bytes)
                .map_err(|e| ThumbnailError::RenderFailed(format!("invalid {which} font: {e}")))
        };
        Ok(Self {
            title: parse(title, "title")?,
            body: parse(body, "body")?,
        })
    }
}

/// Compose the full thumbnail.
pub fn render_card(
    art: &DynamicImage,
    template: &DynamicImage,
    fonts: &Fonts,
    card: &ThumbnailCard,
    watermark: &str,
) -> Result<RgbaImage, ThumbnailError> {
    let template = template
        .resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3)
        .to_rgba8();
    let content = derive_content_box(&template).ok_or_else(|| {
        ThumbnailError::RenderFailed("overlay template has no visible content".into())
    })?;
    let layout = CardLayout::from_content_box(content);

    let mut canvas = dimmed_background(&fit_within(art, CANVAS_WIDTH, CANVAS_HEIGHT));
    imageops::overlay(&mut canvas, &template, 0, 0);

    let album = rounded_art(art, layout.art_size, layout.art_radius);
    imageops::overlay(&mut canvas, &album, layout.art_x.into(), layout.art_y.into());

    let title_size = fit_font_size(TITLE_MAX_SIZE, TITLE_MIN_SIZE, TITLE_MAX_WIDTH, |size| {
        text_size(PxScale::from(size as f32), &fonts.title, &card.title).0
    });
    draw_text_mut(
        &mut canvas,
        TITLE_COLOR,
        layout.text_x as i32,
        layout.title_y as i32,
        PxScale::from(title_size as f32),
        &fonts.title,
        &card.title,
    );
    draw_text_mut(
        &mut canvas,
        DETAIL_COLOR,
        layout.text_x as i32,
        layout.info_y as i32,
        PxScale::from(INFO_SIZE),
        &fonts.body,
        &card.info,
    );
    draw_text_mut(
        &mut canvas,
        DETAIL_COLOR,
        layout.text_x as i32,
        layout.time_y as i32,
        PxScale::from(TIME_SIZE),
        &fonts.body,
        &card.time,
    );

    if !watermark.trim().is_empty() {
        draw_watermark(&mut canvas, &fonts.body, watermark);
    }

    Ok(canvas)
}

/// Scale so the image fits inside `max_w` x `max_h`, keeping its aspect ratio.
pub fn fit_within(img: &DynamicImage, max_w: u32, max_h: u32) -> RgbaImage {
    let ratio = f64::min(
        f64::from(max_w) / f64::from(img.width()),
        f64::from(max_h) / f64::from(img.height()),
    );
    let w = ((f64::from(img.width()) * ratio) as u32).max(1);
    let h = ((f64::from(img.height()) * ratio) as u32).max(1);
    img.resize_exact(w, h, FilterType::Lanczos3).to_rgba8()
}

/// Opaque black canvas with a blurred, darkened copy of `art` laid over it.
pub fn dimmed_background(art: &RgbaImage) -> RgbaImage {
    let mut blurred = imageops::blur(art, BLUR_SIGMA);
    for px in blurred.pixels_mut() {
        for c in 0..3 {
            px[c] = (f32::from(px[c]) * BRIGHTNESS).round() as u8;
        }
    }

    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 255]));
    imageops::overlay(&mut canvas, &blurred, 0, 0);
    canvas
}

/// Square-resized art with rounded corners cut into its alpha channel.
pub fn rounded_art(art: &DynamicImage, size: u32, radius: u32) -> RgbaImage {
    let mut square = art.resize_exact(size, size, FilterType::Lanczos3).to_rgba8();
    for (x, y, px) in square.enumerate_pixels_mut() {
        if !inside_rounded_square(x, y, size, radius) {
            px[3] = 0;
        }
    }
    square
}

fn inside_rounded_square(x: u32, y: u32, size: u32, radius: u32) -> bool {
    if radius == 0 {
        return true;
    }
    let r = radius as f32;
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    let cx = px.clamp(r, size as f32 - r);
    let cy = py.clamp(r, size as f32 - r);
    (px - cx).powi(2) + (py - cy).powi(2) <= r * r
}

/// Bottom-right watermark with a one-pixel dark halo in all eight directions.
fn draw_watermark(canvas: &mut RgbaImage, font: &FontVec, text: &str) {
    let scale = PxScale::from(WATERMARK_SIZE);
    let (w, h) = text_size(scale, font, text);
    let x = canvas.width().saturating_sub(w + WATERMARK_INSET) as i32;
    let y = canvas.height().saturating_sub(h + WATERMARK_INSET) as i32;

    // Drawn on its own layer so the translucent colors blend onto the canvas
    // instead of replacing its alpha.
    let mut layer = RgbaImage::new(canvas.width(), canvas.height());
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_mut(&mut layer, SHADOW_COLOR, x + dx, y + dy, scale, font, text);
        }
    }
    draw_text_mut(&mut layer, WATERMARK_COLOR, x, y, scale, font, text);
    imageops::overlay(canvas, &layer, 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255])))
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        // 480x360 (4:3) is limited by height
        let out = fit_within(&solid(480, 360, [1, 2, 3]), CANVAS_WIDTH, CANVAS_HEIGHT);
        assert_eq!(out.dimensions(), (960, 720));
        // 16:9 fills the canvas exactly
        let out = fit_within(&solid(320, 180, [1, 2, 3]), CANVAS_WIDTH, CANVAS_HEIGHT);
        assert_eq!(out.dimensions(), (1280, 720));
    }

    #[test]
    fn background_is_dimmed_and_opaque() {
        let art = fit_within(&solid(480, 360, [200, 100, 50]), CANVAS_WIDTH, CANVAS_HEIGHT);
        let bg = dimmed_background(&art);
        assert_eq!(bg.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));

        let center = bg.get_pixel(480, 360);
        let expected = [60u8, 30, 15];
        for c in 0..3 {
            assert!(center[c].abs_diff(expected[c]) <= 2, "channel {c}: {}", center[c]);
        }
        assert_eq!(center[3], 255);
        // Outside the 960px-wide art the canvas stays black.
        assert_eq!(bg.get_pixel(1200, 360).0, [0, 0, 0, 255]);
    }

    #[test]
    fn rounded_art_clears_corners_only() {
        let art = rounded_art(&solid(100, 100, [9, 9, 9]), 100, 25);
        assert_eq!(art.get_pixel(0, 0)[3], 0);
        assert_eq!(art.get_pixel(99, 99)[3], 0);
        assert_eq!(art.get_pixel(50, 50)[3], 255);
        assert_eq!(art.get_pixel(50, 0)[3], 255);
        assert_eq!(art.get_pixel(0, 50)[3], 255);
    }

    #[test]
    fn zero_radius_keeps_square() {
        let art = rounded_art(&solid(10, 10, [9, 9, 9]), 10, 0);
        assert!(art.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn invalid_font_bytes_fail_to_render() {
        let err = Fonts::from_bytes(vec![0, 1, 2], vec![3, 4, 5]).err().unwrap();
        assert!(matches!(err, ThumbnailError::RenderFailed(_)));
    }
}
