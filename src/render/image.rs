//! Embedded image projection.
//!
//! Pipeline per image item: crop to the recorded pixel box, apply the flip
//! flags and rotation recorded by Squid, downsample toward the target DPI,
//! then embed as base64 PNG.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::archive::{image_entry, EntryReader};
use crate::error::{Error, Result};
use crate::record::{CropRect, ImageItem};
use crate::report::Reporter;
use crate::units::to_points;

use super::ProjectOptions;

/// Line length of the embedded base64 payload.
const BASE64_LINE_LEN: usize = 76;

/// An image ready to be written: placement in points and base64 PNG data.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// Base64 PNG, wrapped, newline-terminated
    pub data: String,
}

/// Load, transform and encode one image item.
pub fn project_image<E, P>(
    item: &ImageItem,
    assets: &mut E,
    options: &ProjectOptions,
    reporter: &P,
) -> Result<ImageElement>
where
    E: EntryReader + ?Sized,
    P: Reporter + ?Sized,
{
    let left = to_points(f64::from(item.bounds.left));
    let top = to_points(f64::from(item.bounds.top));
    let right = to_points(f64::from(item.bounds.right));
    let bottom = to_points(f64::from(item.bounds.bottom));

    let bytes = assets.read_entry(&image_entry(&item.image_ref))?;
    // Decoding never applies EXIF orientation; only the record's own flags count.
    let img = image::load_from_memory(&bytes)?;

    let (x, y, w, h) = crop_region(item.crop_bounds, img.width(), img.height()).ok_or_else(|| {
        Error::Image(format!(
            "crop box {:?} is empty for a {}x{} image",
            item.crop_bounds,
            img.width(),
            img.height()
        ))
    })?;
    let img = img.crop_imm(x, y, w, h);
    let img = apply_flips(img, item.flip_x, item.flip_y);
    let img = apply_rotation(img, item.rotation, reporter);

    // Resolution follows the recorded crop box, even where it overhangs the image.
    let (span_x, span_y) = if item.crop_bounds.is_unset() {
        (f64::from(w), f64::from(h))
    } else {
        (
            f64::from(item.crop_bounds.right) - f64::from(item.crop_bounds.left),
            f64::from(item.crop_bounds.bottom) - f64::from(item.crop_bounds.top),
        )
    };
    let x_scale = downsample_factor(options.image_dpi, span_x, right - left);
    let y_scale = downsample_factor(options.image_dpi, span_y, bottom - top);
    let img = resample(img, x_scale, y_scale);

    let png = encode_png(&img)?;
    Ok(ImageElement {
        left,
        top,
        right,
        bottom,
        data: encode_base64_wrapped(&png),
    })
}

/// Clamp the recorded crop box to the image as `(x, y, width, height)`.
///
/// An all-zero box selects the whole image. `None` if nothing remains.
pub fn crop_region(crop: CropRect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if crop.is_unset() {
        return (width > 0 && height > 0).then_some((0, 0, width, height));
    }

    let clamp = |v: i32, max: u32| (v.max(0) as u32).min(max);
    let left = clamp(crop.left, width);
    let right = clamp(crop.right, width);
    let top = clamp(crop.top, height);
    let bottom = clamp(crop.bottom, height);

    if right <= left || bottom <= top {
        return None;
    }
    Some((left, top, right - left, bottom - top))
}

/// Apply Squid's flip flags.
///
/// `flip_x` mirrors top to bottom and `flip_y` mirrors left to right, which
/// is how Squid itself renders them.
pub fn apply_flips(img: DynamicImage, flip_x: bool, flip_y: bool) -> DynamicImage {
    let img = if flip_x { img.flipv() } else { img };
    if flip_y {
        img.fliph()
    } else {
        img
    }
}

/// Rotate by a multiple of 90 degrees clockwise.
pub fn apply_rotation<P: Reporter + ?Sized>(
    img: DynamicImage,
    rotation: i32,
    reporter: &P,
) -> DynamicImage {
    match rotation {
        0 => img,
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        other => {
            reporter.warning(&format!("Image rotation angle {} is not supported", other));
            img
        }
    }
}

/// Scale factor bringing `pixels` spread over `points` down to `target_dpi`.
///
/// Never above 1.0. A degenerate placement yields 1.0.
pub fn downsample_factor(target_dpi: u32, pixels: f64, points: f64) -> f64 {
    let current_dpi = 72.0 * pixels / points;
    if !current_dpi.is_finite() || current_dpi <= 0.0 {
        return 1.0;
    }
    (f64::from(target_dpi) / current_dpi).min(1.0)
}

/// Resize by independent factors; a no-op when both are 1.0.
pub fn resample(img: DynamicImage, x_scale: f64, y_scale: f64) -> DynamicImage {
    if x_scale >= 1.0 && y_scale >= 1.0 {
        return img;
    }
    let (w, h) = img.dimensions();
    let new_w = (f64::from(w) * x_scale).round().max(1.0) as u32;
    let new_h = (f64::from(h) * y_scale).round().max(1.0) as u32;
    log::debug!("Resampling image {}x{} to {}x{}", w, h, new_w, new_h);
    img.resize_exact(new_w, new_h, FilterType::Triangle)
}

/// Encode as PNG, keeping the channel layout where PNG allows it.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba16(img.to_rgba16()).write_to(&mut out, ImageFormat::Png)?
        }
        _ => img.write_to(&mut out, ImageFormat::Png)?,
    }
    Ok(out.into_inner())
}

/// Base64 in MIME-style lines, each newline-terminated.
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_LEN + 1);
    for line in encoded.as_bytes().chunks(BASE64_LINE_LEN) {
        // base64 output is ASCII
        out.push_str(std::str::from_utf8(line).unwrap_or_default());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Rect;
    use crate::report::MemoryReporter;
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use std::collections::HashMap;

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| Luma([(x * 10 + y) as u8])))
    }

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        encode_png(img).unwrap()
    }

    fn decode_element(el: &ImageElement) -> DynamicImage {
        let joined: String = el.data.lines().collect();
        let bytes = STANDARD.decode(joined).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_crop_region() {
        assert_eq!(
            crop_region(CropRect::new(2, 3, 8, 9), 10, 10),
            Some((2, 3, 6, 6))
        );
        assert_eq!(
            crop_region(CropRect::new(-5, 0, 50, 4), 10, 10),
            Some((0, 0, 10, 4))
        );
        assert_eq!(crop_region(CropRect::default(), 7, 5), Some((0, 0, 7, 5)));
        assert_eq!(crop_region(CropRect::new(5, 0, 5, 4), 10, 10), None);
        assert_eq!(crop_region(CropRect::new(12, 0, 20, 4), 10, 10), None);
    }

    #[test]
    fn test_flip_axes() {
        let img = gradient(3, 2);
        let px = |img: &DynamicImage, x, y| img.get_pixel(x, y).0[0];

        let fx = apply_flips(img.clone(), true, false);
        assert_eq!(px(&fx, 0, 0), px(&img, 0, 1));

        let fy = apply_flips(img.clone(), false, true);
        assert_eq!(px(&fy, 0, 0), px(&img, 2, 0));

        let both = apply_flips(img.clone(), true, true);
        assert_eq!(px(&both, 0, 0), px(&img, 2, 1));
    }

    #[test]
    fn test_rotation() {
        let img = gradient(4, 2);
        let reporter = MemoryReporter::new();

        let r90 = apply_rotation(img.clone(), 90, &reporter);
        assert_eq!(r90.dimensions(), (2, 4));
        // Clockwise: the bottom-left source pixel lands top-left.
        assert_eq!(r90.get_pixel(0, 0), img.get_pixel(0, 1));

        let r270 = apply_rotation(img.clone(), 270, &reporter);
        assert_eq!(r270.get_pixel(0, 0), img.get_pixel(3, 0));

        let r180 = apply_rotation(img.clone(), 180, &reporter);
        assert_eq!(r180.get_pixel(0, 0), img.get_pixel(3, 1));

        assert!(reporter.warnings().is_empty());
        assert_eq!(apply_rotation(img.clone(), 0, &reporter), img);
    }

    #[test]
    fn test_unsupported_rotation_warns() {
        let img = gradient(4, 2);
        let reporter = MemoryReporter::new();
        let out = apply_rotation(img.clone(), 45, &reporter);
        assert_eq!(out, img);
        assert_eq!(reporter.warnings().len(), 1);
        assert!(reporter.warnings()[0].contains("45"));
    }

    #[test]
    fn test_downsample_factor() {
        // 300 dpi: 300 pixels over 72 points.
        assert!((downsample_factor(150, 300.0, 72.0) - 0.5).abs() < 1e-12);
        // 75 dpi is never upsampled.
        assert_eq!(downsample_factor(150, 75.0, 72.0), 1.0);
        assert_eq!(downsample_factor(150, 100.0, 0.0), 1.0);
        assert_eq!(downsample_factor(150, 100.0, -10.0), 1.0);
        assert_eq!(downsample_factor(150, -100.0, 72.0), 1.0);
    }

    #[test]
    fn test_resample() {
        let img = gradient(100, 40);
        assert_eq!(resample(img.clone(), 1.0, 1.0).dimensions(), (100, 40));
        assert_eq!(resample(img.clone(), 0.5, 1.0).dimensions(), (50, 40));
        assert_eq!(resample(img.clone(), 0.001, 0.25).dimensions(), (1, 10));
    }

    #[test]
    fn test_base64_wrapping() {
        let data = vec![0u8; 100];
        let out = encode_base64_wrapped(&data);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert!(out.ends_with('\n'));
        assert_eq!(encode_base64_wrapped(&[]), "");
    }

    #[test]
    fn test_project_image_pipeline() {
        // 400x200 pixels placed on 2.54 x 2.54 cm (72 x 72 pt): 400 and 200 dpi.
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(400, 200, Rgba([1, 2, 3, 4])));
        let mut assets = HashMap::new();
        assets.insert("data/imgs/h1".to_string(), png_bytes(&source));

        let item = ImageItem {
            bounds: Rect::new(0.0, 0.0, 2.54, 2.54),
            crop_bounds: CropRect::new(0, 0, 400, 200),
            image_ref: "h1".to_string(),
            ..Default::default()
        };
        let reporter = MemoryReporter::new();
        let el = project_image(&item, &mut assets, &ProjectOptions::default(), &reporter).unwrap();

        assert!((el.right - 72.0).abs() < 1e-4);
        assert!((el.bottom - 72.0).abs() < 1e-4);
        let out = decode_element(&el);
        assert_eq!(out.dimensions(), (150, 150));
        assert_eq!(out.color(), image::ColorType::Rgba8);
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_project_image_crop_and_rotate() {
        let source = gradient(20, 10);
        let mut assets = HashMap::new();
        assets.insert("data/imgs/g".to_string(), png_bytes(&source));

        let item = ImageItem {
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            crop_bounds: CropRect::new(5, 0, 15, 4),
            image_ref: "g".to_string(),
            rotation: 90,
            ..Default::default()
        };
        let el = project_image(&item, &mut assets, &ProjectOptions::default(), &MemoryReporter::new())
            .unwrap();
        let out = decode_element(&el);
        assert_eq!(out.dimensions(), (4, 10));
        assert_eq!(out.color(), image::ColorType::L8);
        assert_eq!(out.get_pixel(3, 0), source.get_pixel(5, 0));
    }

    #[test]
    fn test_project_image_resolution_uses_recorded_crop() {
        // The crop box claims 600 px over one inch while the image only has 300.
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 300, Rgba([9, 9, 9, 255])));
        let mut assets = HashMap::new();
        assets.insert("data/imgs/big".to_string(), png_bytes(&source));

        let item = ImageItem {
            bounds: Rect::new(0.0, 0.0, 2.54, 2.54),
            crop_bounds: CropRect::new(0, 0, 600, 600),
            image_ref: "big".to_string(),
            ..Default::default()
        };
        let el = project_image(&item, &mut assets, &ProjectOptions::default(), &MemoryReporter::new())
            .unwrap();
        assert_eq!(decode_element(&el).dimensions(), (75, 75));
    }

    #[test]
    fn test_project_image_flips_before_rotating() {
        let source = gradient(20, 10);
        let mut assets = HashMap::new();
        assets.insert("data/imgs/g".to_string(), png_bytes(&source));

        let item = ImageItem {
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            crop_bounds: CropRect::new(5, 0, 15, 4),
            image_ref: "g".to_string(),
            flip_x: true,
            rotation: 90,
            ..Default::default()
        };
        let el = project_image(&item, &mut assets, &ProjectOptions::default(), &MemoryReporter::new())
            .unwrap();
        let out = decode_element(&el);

        let expected = source.crop_imm(5, 0, 10, 4).flipv().rotate90();
        assert_eq!(out.dimensions(), expected.dimensions());
        assert_eq!(out.get_pixel(0, 0), expected.get_pixel(0, 0));
        assert_eq!(out.get_pixel(3, 9), expected.get_pixel(3, 9));
        // Flipping then rotating brings the top-left crop pixel to the origin.
        assert_eq!(out.get_pixel(0, 0), source.get_pixel(5, 0));
        assert_ne!(out.get_pixel(3, 0), source.get_pixel(5, 0));
    }

    #[test]
    fn test_project_image_missing_attachment() {
        let mut assets: HashMap<String, Vec<u8>> = HashMap::new();
        let item = ImageItem {
            image_ref: "gone".to_string(),
            ..Default::default()
        };
        let err = project_image(&item, &mut assets, &ProjectOptions::default(), &MemoryReporter::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingEntry(_)));
    }

    #[test]
    fn test_project_image_undecodable() {
        let mut assets = HashMap::new();
        assets.insert("data/imgs/bad".to_string(), b"not an image".to_vec());
        let item = ImageItem {
            image_ref: "bad".to_string(),
            ..Default::default()
        };
        let err = project_image(&item, &mut assets, &ProjectOptions::default(), &MemoryReporter::new())
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }
}
