//! QR rendering for short URLs.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use qrcode::render::svg;
use qrcode::QrCode;

/// Render `contents` as a QR image, returned as a base64 SVG data URL
/// suitable for an `<img src=...>` attribute.
pub fn data_url(contents: &str) -> Result<String> {
    let code = QrCode::new(contents.as_bytes())?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .build();

    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_data_url() {
        let out = data_url("http://localhost:3000/r/abc12345").unwrap();
        assert!(out.starts_with("data:image/svg+xml;base64,"));
        assert!(out.len() > 100);
    }

    #[test]
    fn rendering_is_idempotent() {
        let a = data_url("http://localhost:3000/r/abc12345").unwrap();
        let b = data_url("http://localhost:3000/r/abc12345").unwrap();
        assert_eq!(a, b);
    }
}
