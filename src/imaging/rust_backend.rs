//! Production backend built on the `image` crate — pure Rust, statically linked.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe (content sniff) | `ImageReader::with_guessed_format` |
//! | Identify | `ImageReader::into_dimensions` (header read, no full decode) |
//! | Resample | `DynamicImage::resize_exact` with `Triangle` (bilinear) |
//! | Composite | `imageops::overlay` (alpha-aware, clips off-canvas regions) |
//! | Encode | `codecs::jpeg::JpegEncoder` at configured quality |

use super::backend::{BackendError, Dimensions, ImageBackend, SourceFormat};
use super::params::{Quality, RenderParams};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{FilterType, overlay};
use image::{DynamicImage, ExtendedColorType, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::io::BufWriter;
use std::path::Path;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Encode an RGBA canvas as JPEG. Alpha is dropped at this point; any
/// transparency handling (white backdrop) happened during compositing.
fn encode_jpeg(canvas: RgbaImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
    encoder
        .encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::Encode(format!("{}: {}", path.display(), e)))
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<Option<SourceFormat>, BackendError> {
        let format = ImageReader::open(path)?.with_guessed_format()?.format();
        Ok(match format {
            Some(ImageFormat::Jpeg) => Some(SourceFormat::Jpeg),
            Some(ImageFormat::Png) => Some(SourceFormat::Png),
            Some(ImageFormat::Gif) => Some(SourceFormat::Gif),
            _ => None,
        })
    }

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| BackendError::Probe(format!("{}: {}", path.display(), e)))?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<(), BackendError> {
        let source = load_image(&params.source)?;
        let resized = source.resize_exact(params.width, params.height, FilterType::Triangle);

        // The resample fills the whole canvas, so the backdrop only shows
        // through source transparency.
        let mut canvas = if params.white_backdrop {
            let mut base = RgbaImage::from_pixel(params.width, params.height, WHITE);
            overlay(&mut base, &resized.to_rgba8(), 0, 0);
            base
        } else {
            resized.to_rgba8()
        };

        if let Some(mark) = &params.watermark {
            let logo = load_image(&mark.path)?.to_rgba8();
            // overlay clips whatever falls outside the canvas
            overlay(&mut canvas, &logo, mark.x, mark.y);
        }

        encode_jpeg(canvas, &params.output, params.quality)
    }

    fn copy(&self, source: &Path, dest: &Path) -> Result<(), BackendError> {
        std::fs::copy(source, dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::WatermarkOverlay;
    use image::{Frame, ImageEncoder, RgbImage};

    /// Write a small valid JPEG with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
    }

    /// Write an RGBA PNG filled with a single pixel value.
    fn create_test_png(path: &Path, width: u32, height: u32, pixel: Rgba<u8>) {
        let img = RgbaImage::from_pixel(width, height, pixel);
        let file = std::fs::File::create(path).unwrap();
        let writer = BufWriter::new(file);
        image::codecs::png::PngEncoder::new(writer)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
    }

    /// Write a single-frame GIF.
    fn create_test_gif(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 200, 10, 255]));
        let file = std::fs::File::create(path).unwrap();
        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder.encode_frame(Frame::new(img)).unwrap();
    }

    #[test]
    fn probe_sniffs_content_not_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        // JPEG bytes behind a .png name
        let path = tmp.path().join("lying.png");
        create_test_jpeg(&path, 10, 10);

        let backend = RustBackend::new();
        assert_eq!(backend.probe(&path).unwrap(), Some(SourceFormat::Jpeg));
    }

    #[test]
    fn probe_recognizes_png_and_gif() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png = tmp.path().join("a.png");
        let gif = tmp.path().join("b.gif");
        create_test_png(&png, 4, 4, Rgba([0, 0, 0, 255]));
        create_test_gif(&gif, 4, 4);

        let backend = RustBackend::new();
        assert_eq!(backend.probe(&png).unwrap(), Some(SourceFormat::Png));
        assert_eq!(backend.probe(&gif).unwrap(), Some(SourceFormat::Gif));
    }

    #[test]
    fn probe_unknown_content_returns_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.bin");
        std::fs::write(&path, b"not an image at all").unwrap();

        let backend = RustBackend::new();
        assert_eq!(backend.probe(&path).unwrap(), None);
    }

    #[test]
    fn identify_reads_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!((dims.width, dims.height), (200, 150));
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        assert!(backend.identify(Path::new("/nonexistent/image.jpg")).is_err());
    }

    #[test]
    fn render_produces_jpeg_at_exact_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend
            .render(&RenderParams {
                source,
                output: output.clone(),
                width: 200,
                height: 150,
                white_backdrop: false,
                quality: Quality::new(80),
                watermark: None,
            })
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (200, 150));
        assert_eq!(backend.probe(&output).unwrap(), Some(SourceFormat::Jpeg));
    }

    #[test]
    fn render_white_backdrop_fills_transparency() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("clear.png");
        create_test_png(&source, 8, 8, Rgba([0, 0, 0, 0]));

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend
            .render(&RenderParams {
                source,
                output: output.clone(),
                width: 8,
                height: 8,
                white_backdrop: true,
                quality: Quality::new(90),
                watermark: None,
            })
            .unwrap();

        let decoded = load_image(&output).unwrap().to_rgb8();
        // JPEG is lossy; allow a few counts of drift from pure white
        let px = decoded.get_pixel(4, 4);
        assert!(px[0] >= 250 && px[1] >= 250 && px[2] >= 250, "got {px:?}");
    }

    #[test]
    fn render_composites_watermark_with_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_png(&source, 32, 32, Rgba([0, 0, 0, 255]));
        let mark = tmp.path().join("mark.png");
        create_test_png(&mark, 8, 8, Rgba([255, 0, 0, 255]));

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend
            .render(&RenderParams {
                source,
                output: output.clone(),
                width: 32,
                height: 32,
                white_backdrop: true,
                quality: Quality::new(95),
                watermark: Some(WatermarkOverlay {
                    path: mark,
                    x: 12,
                    y: 12,
                }),
            })
            .unwrap();

        let decoded = load_image(&output).unwrap().to_rgb8();
        let inside = decoded.get_pixel(15, 15);
        assert!(inside[0] >= 200 && inside[1] < 80, "watermark pixel {inside:?}");
        let outside = decoded.get_pixel(2, 2);
        assert!(outside[0] < 80, "background pixel {outside:?}");
    }

    #[test]
    fn render_off_canvas_watermark_is_clipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 16, 16);
        let mark = tmp.path().join("mark.png");
        create_test_png(&mark, 64, 64, Rgba([255, 0, 0, 255]));

        let output = tmp.path().join("out.jpg");
        let backend = RustBackend::new();
        backend
            .render(&RenderParams {
                source,
                output: output.clone(),
                width: 16,
                height: 16,
                white_backdrop: false,
                quality: Quality::new(80),
                // Oversized watermark at negative offsets still renders
                watermark: Some(WatermarkOverlay {
                    path: mark,
                    x: -24,
                    y: -24,
                }),
            })
            .unwrap();

        assert!(output.is_file());
    }

    #[test]
    fn copy_is_byte_identical() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("anim.gif");
        create_test_gif(&source, 12, 9);

        let dest = tmp.path().join("copied.jpg");
        let backend = RustBackend::new();
        backend.copy(&source, &dest).unwrap();

        assert_eq!(
            std::fs::read(&source).unwrap(),
            std::fs::read(&dest).unwrap()
        );
    }
}
