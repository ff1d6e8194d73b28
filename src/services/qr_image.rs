//! PNG rendering of QR codes
//!
//! Used for the business-card preview (data URI in `GET /qr`) and the
//! downloadable images of the active code and of each resume.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgb};
use qrcode::{EcLevel, QrCode};

use crate::errors::LinkfolioError;

pub const DEFAULT_IMAGE_SIZE: u32 = 512;
pub const MIN_IMAGE_SIZE: u32 = 128;
pub const MAX_IMAGE_SIZE: u32 = 2048;

/// Colour scheme, matching the `qr_theme` stored with each code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrTheme {
    /// 白底靛蓝码
    #[default]
    Light,
    /// 深靛蓝底白码
    Dark,
    /// 黑白，用于打印
    Mono,
}

impl QrTheme {
    /// Unknown names fall back to `Light`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => QrTheme::Dark,
            "mono" | "print" => QrTheme::Mono,
            _ => QrTheme::Light,
        }
    }

    /// (dark modules, background)
    fn colors(self) -> (Rgb<u8>, Rgb<u8>) {
        match self {
            QrTheme::Light => (Rgb([0x4f, 0x46, 0xe5]), Rgb([0xff, 0xff, 0xff])),
            QrTheme::Dark => (Rgb([0xff, 0xff, 0xff]), Rgb([0x1e, 0x1b, 0x4b])),
            QrTheme::Mono => (Rgb([0x00, 0x00, 0x00]), Rgb([0xff, 0xff, 0xff])),
        }
    }
}

/// Encode `content` as a PNG at least `size` pixels wide (clamped)
pub fn render_qr_png(content: &str, theme: QrTheme, size: u32) -> Result<Vec<u8>, LinkfolioError> {
    if content.is_empty() {
        return Err(LinkfolioError::validation("QR content is empty"));
    }

    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::M)
        .map_err(|e| LinkfolioError::validation(format!("cannot encode QR: {}", e)))?;

    let size = size.clamp(MIN_IMAGE_SIZE, MAX_IMAGE_SIZE);
    let (dark, light) = theme.colors();
    let image = code
        .render::<Rgb<u8>>()
        .dark_color(dark)
        .light_color(light)
        .quiet_zone(true)
        .min_dimensions(size, size)
        .build();

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| LinkfolioError::file_operation(format!("PNG encoding failed: {}", e)))?;
    Ok(png.into_inner())
}

pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_render_png() {
        let png = render_qr_png("https://yahya.dev/qr/ab12cd34", QrTheme::Light, 256).unwrap();
        assert!(png.starts_with(PNG_MAGIC));

        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= 256);
        assert_eq!(decoded.width(), decoded.height());
    }

    #[test]
    fn test_size_is_clamped() {
        let png = render_qr_png("x", QrTheme::Mono, 1).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= MIN_IMAGE_SIZE);
    }

    #[test]
    fn test_dark_theme_background() {
        let png = render_qr_png("https://yahya.dev/me/abc", QrTheme::Dark, 200).unwrap();
        let rgb = image::load_from_memory(&png).unwrap().to_rgb8();
        // 左上角在静区内，应为背景色
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0x1e, 0x1b, 0x4b]));
    }

    #[test]
    fn test_empty_content_rejected() {
        assert!(matches!(
            render_qr_png("", QrTheme::Light, 256),
            Err(LinkfolioError::Validation(_))
        ));
    }

    #[test]
    fn test_theme_names_and_data_uri() {
        assert_eq!(QrTheme::from_name("DARK"), QrTheme::Dark);
        assert_eq!(QrTheme::from_name("print"), QrTheme::Mono);
        assert_eq!(QrTheme::from_name("sepia"), QrTheme::Light);
        assert_eq!(png_data_uri(b"abc"), "data:image/png;base64,YWJj");
    }
}
