//! PNG encoding of surface snapshots.

use crate::surface::PixelBuffer;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot export an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

/// Encode a snapshot as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (buffer.width(), buffer.height());
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage { width, height });
    }

    let rgba = demultiply(buffer.data());
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encoding(format!("header: {}", e)))?;
        writer
            .write_image_data(&rgba)
            .map_err(|e| ExportError::Encoding(format!("image data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| ExportError::Encoding(format!("finish: {}", e)))?;
    }

    Ok(png_data)
}

/// Convert premultiplied RGBA8 to straight alpha, as PNG expects.
fn demultiply(premultiplied: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premultiplied.len());
    for px in premultiplied.chunks_exact(4) {
        let a = px[3];
        match a {
            0 => out.extend_from_slice(&[0, 0, 0, 0]),
            255 => out.extend_from_slice(px),
            _ => {
                let unscale = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
                out.extend_from_slice(&[unscale(px[0]), unscale(px[1]), unscale(px[2]), a]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::PhysicalSize;
    use peniko::Color;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_encode_opaque_buffer() {
        let buffer = PixelBuffer::filled(PhysicalSize::new(3, 2), Color::from_rgba8(12, 34, 56, 255));
        let bytes = encode_png(&buffer).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let (info, pixels) = decode(&bytes);
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(pixels, buffer.data());
    }

    #[test]
    fn test_encode_demultiplies() {
        let buffer = PixelBuffer::new(PhysicalSize::new(2, 1), vec![64, 0, 32, 128, 0, 0, 0, 0]).unwrap();
        let (_, pixels) = decode(&encode_png(&buffer).unwrap());
        assert_eq!(pixels, vec![128, 0, 64, 128, 0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_image_rejected() {
        let buffer = PixelBuffer::new(PhysicalSize::new(0, 5), Vec::new()).unwrap();
        assert!(matches!(encode_png(&buffer), Err(ExportError::EmptyImage { .. })));
    }
}
