//! Sheet generator: composes a printable grid of QR tiles.
//!
//! Each tile is a 150×150 QR symbol encoding this deployment's /view URL
//! for one code, with a 60×60 logo pasted over the center and the code
//! drawn underneath it. Error-correction level H tolerates the logo
//! covering roughly 16% of the symbol, which is what makes the overlay
//! scannable at all; the 60-over-150 ratio is a design constant.

use std::io::Cursor;
use std::path::PathBuf;

use ab_glyph::{FontVec, PxScale};
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

pub const COLS: u32 = 10;
pub const ROWS: u32 = 10;
pub const TILE_SIZE: u32 = 150;
pub const LOGO_SIZE: u32 = 60;
/// Items beyond a full grid are silently dropped. Contractual, not a bug.
pub const MAX_TILES: usize = (COLS * ROWS) as usize;

const QUIET_ZONE: usize = 1;
const DEFAULT_CODE: &str = "AVX";
const LABEL_SCALE: f32 = 16.0;
const LABEL_COLOR: Rgba<u8> = Rgba([0, 128, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// One entry of the /generate_sheet payload: `{"X1": "<code>"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetItem {
    #[serde(rename = "X1")]
    pub code: Option<String>,
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("QR encoding error: {0}")]
    Qr(#[from] QrError),
}

pub struct SheetGenerator {
    base_url: String,
    logo_path: PathBuf,
    font: Option<FontVec>,
}

impl SheetGenerator {
    pub fn new(base_url: &str, logo_path: &str, font_path: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            logo_path: PathBuf::from(logo_path),
            font: font_path.and_then(load_font),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.public_base_url,
            &config.logo_path,
            config.font_path.as_deref(),
        )
    }

    /// Fully-qualified detail URL a scanned tile resolves to.
    pub(crate) fn view_url(&self, code: &str) -> String {
        format!("{}/view/{}", self.base_url, urlencoding::encode(code))
    }

    /// Compose the full sheet as PNG bytes. Any failure aborts the whole
    /// batch; there is no partial output.
    pub fn generate(&self, items: &[SheetItem]) -> Result<Vec<u8>, SheetError> {
        let logo = image::open(&self.logo_path)?
            .thumbnail(LOGO_SIZE, LOGO_SIZE)
            .to_rgba8();

        let mut sheet = RgbaImage::from_pixel(COLS * TILE_SIZE, ROWS * TILE_SIZE, WHITE);
        for (idx, item) in items.iter().take(MAX_TILES).enumerate() {
            let code = item.code.as_deref().unwrap_or(DEFAULT_CODE);
            let tile = self.render_tile(code, &logo)?;
            let x = (idx as u32 % COLS) * TILE_SIZE;
            let y = (idx as u32 / COLS) * TILE_SIZE;
            imageops::replace(&mut sheet, &tile, i64::from(x), i64::from(y));
        }

        let mut buf = Cursor::new(Vec::new());
        sheet.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    fn render_tile(&self, code: &str, logo: &RgbaImage) -> Result<RgbaImage, SheetError> {
        let url = self.view_url(code);
        let qr = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)?;
        let modules = qr.to_colors();
        let width = qr.width();
        let total = width + 2 * QUIET_ZONE;

        // Nearest-neighbor scale of the module grid (plus quiet zone)
        // onto the tile canvas.
        let mut tile = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, WHITE);
        for y in 0..TILE_SIZE {
            let my = (y as usize * total) / TILE_SIZE as usize;
            for x in 0..TILE_SIZE {
                let mx = (x as usize * total) / TILE_SIZE as usize;
                let in_symbol = (QUIET_ZONE..width + QUIET_ZONE).contains(&mx)
                    && (QUIET_ZONE..width + QUIET_ZONE).contains(&my);
                if in_symbol
                    && modules[(my - QUIET_ZONE) * width + (mx - QUIET_ZONE)] == Color::Dark
                {
                    tile.put_pixel(x, y, BLACK);
                }
            }
        }

        let logo_x = (TILE_SIZE - logo.width()) / 2;
        let logo_y = (TILE_SIZE - logo.height()) / 2;
        imageops::overlay(&mut tile, logo, i64::from(logo_x), i64::from(logo_y));

        if let Some(font) = &self.font {
            let scale = PxScale::from(LABEL_SCALE);
            let (text_w, text_h) = text_size(scale, font, code);
            let text_x = (TILE_SIZE as i32 - text_w as i32) / 2;
            // Bottom-align the label with the logo's bottom edge
            let text_y = logo_y as i32 + logo.height() as i32 - text_h as i32;
            draw_text_mut(&mut tile, LABEL_COLOR, text_x, text_y, scale, font, code);
        }

        Ok(tile)
    }
}

fn load_font(path: &str) -> Option<FontVec> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Label font {} unavailable ({}); sheets will have no text labels", path, e);
            return None;
        }
    };
    match FontVec::try_from_vec(bytes) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("Label font {} failed to parse ({}); sheets will have no text labels", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_generator(dir: &TempDir) -> SheetGenerator {
        let logo_path = dir.path().join("logo.png");
        RgbaImage::from_pixel(LOGO_SIZE, LOGO_SIZE, Rgba([200, 30, 30, 255]))
            .save(&logo_path)
            .unwrap();
        SheetGenerator::new("http://localhost:8080/", logo_path.to_str().unwrap(), None)
    }

    fn items(codes: &[&str]) -> Vec<SheetItem> {
        codes
            .iter()
            .map(|c| SheetItem {
                code: Some(c.to_string()),
            })
            .collect()
    }

    #[test]
    fn test_view_url_strips_slash_and_encodes() {
        let dir = TempDir::new().unwrap();
        let generator = test_generator(&dir);
        assert_eq!(generator.view_url("AVX"), "http://localhost:8080/view/AVX");
        assert_eq!(generator.view_url("A B/C"), "http://localhost:8080/view/A%20B%2FC");
    }

    #[test]
    fn test_empty_batch_yields_blank_full_size_canvas() {
        let dir = TempDir::new().unwrap();
        let generator = test_generator(&dir);
        let png = generator.generate(&[]).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), COLS * TILE_SIZE);
        assert_eq!(img.height(), ROWS * TILE_SIZE);
    }

    #[test]
    fn test_full_grid_and_truncation_beyond_100() {
        let dir = TempDir::new().unwrap();
        let generator = test_generator(&dir);

        let codes: Vec<String> = (0..110).map(|i| format!("C{i}")).collect();
        let refs: Vec<&str> = codes.iter().map(String::as_str).collect();
        let over = generator.generate(&items(&refs)).unwrap();
        let exact = generator.generate(&items(&refs[..MAX_TILES])).unwrap();

        // Items past the grid are dropped, so 110 and 100 produce the
        // same sheet.
        assert_eq!(over, exact);
        let img = image::load_from_memory(&exact).unwrap();
        assert_eq!((img.width(), img.height()), (COLS * TILE_SIZE, ROWS * TILE_SIZE));
    }

    #[test]
    fn test_tile_contains_dark_modules() {
        let dir = TempDir::new().unwrap();
        let generator = test_generator(&dir);
        let png = generator.generate(&items(&["AVX"])).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();

        // First tile has QR modules, rest of the sheet stays white
        let first_tile_dark = (0..TILE_SIZE)
            .flat_map(|y| (0..TILE_SIZE).map(move |x| (x, y)))
            .any(|(x, y)| img.get_pixel(x, y).0 == [0, 0, 0, 255]);
        assert!(first_tile_dark);
        assert_eq!(
            img.get_pixel(TILE_SIZE + 10, 10).0,
            [255, 255, 255, 255]
        );
    }

    #[test]
    fn test_missing_code_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let generator = test_generator(&dir);
        let fallback = generator.generate(&[SheetItem { code: None }]).unwrap();
        let explicit = generator.generate(&items(&[DEFAULT_CODE])).unwrap();
        assert_eq!(fallback, explicit);
    }

    #[test]
    fn test_missing_logo_aborts_batch() {
        let generator = SheetGenerator::new("http://localhost:8080", "/nonexistent/logo.png", None);
        assert!(generator.generate(&items(&["AVX"])).is_err());
    }
}
