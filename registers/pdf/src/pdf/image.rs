// Licensed under the Apache-2.0 license

//! Raster images placed on pages.
//!
//! An [`Image`] is decoded once when it is loaded. Clones share the pixels,
//! and the writer embeds each distinct image a single time no matter how
//! many pages draw it.

use anyhow::{ensure, Context};
use lopdf::{dictionary, Object, ObjectId, Stream};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

struct Pixels {
    width: u32,
    height: u32,
    /// 8-bit RGB samples, row by row from the top.
    rgb: Vec<u8>,
    /// 8-bit alpha samples, present when the source had transparency.
    alpha: Option<Vec<u8>>,
}

/// A decoded raster image.
#[derive(Clone)]
pub struct Image {
    pixels: Arc<Pixels>,
}

impl Image {
    /// Decode a PNG or JPEG file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("in {}", path.display()))
    }

    /// Decode PNG or JPEG data.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let decoded = image::load_from_memory(bytes).context("failed to decode image")?;
        let alpha = decoded
            .color()
            .has_alpha()
            .then(|| decoded.to_rgba8().pixels().map(|p| p.0[3]).collect());
        let rgb = decoded.to_rgb8();
        Ok(Self::with_pixels(rgb.width(), rgb.height(), rgb.into_raw(), alpha))
    }

    /// An opaque image from raw 8-bit RGB samples.
    pub fn from_rgb8(width: u32, height: u32, rgb: Vec<u8>) -> anyhow::Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3));
        ensure!(
            expected == Some(rgb.len()),
            "{width}x{height} image needs {} RGB bytes, got {}",
            expected.map_or("too many".to_string(), |n| n.to_string()),
            rgb.len()
        );
        Ok(Self::with_pixels(width, height, rgb, None))
    }

    fn with_pixels(width: u32, height: u32, rgb: Vec<u8>, alpha: Option<Vec<u8>>) -> Self {
        Image {
            pixels: Arc::new(Pixels {
                width,
                height,
                rgb,
                alpha,
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width
    }

    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    pub fn has_alpha(&self) -> bool {
        self.pixels.alpha.is_some()
    }

    /// Largest `(width, height)` with this image's aspect ratio that fits in
    /// a `width` x `height` box.
    pub fn fit(&self, width: f32, height: f32) -> (f32, f32) {
        if self.width() == 0 || self.height() == 0 {
            return (0.0, 0.0);
        }
        let scale = (width / self.width() as f32).min(height / self.height() as f32);
        (self.width() as f32 * scale, self.height() as f32 * scale)
    }

    /// Adds the image XObject, and its soft mask if it has one, to `pdf`.
    pub(crate) fn add_to(&self, pdf: &mut lopdf::Document) -> ObjectId {
        let sample_dict = |color_space: &str| {
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width()),
                "Height" => i64::from(self.height()),
                "ColorSpace" => Object::Name(color_space.as_bytes().to_vec()),
                "BitsPerComponent" => 8,
            }
        };
        let mut dict = sample_dict("DeviceRGB");
        if let Some(alpha) = &self.pixels.alpha {
            let mask = pdf.add_object(Stream::new(sample_dict("DeviceGray"), alpha.clone()));
            dict.set("SMask", mask);
        }
        pdf.add_object(Stream::new(dict, self.pixels.rgb.clone()))
    }
}

/// Images are equal when they share pixels, i.e. one is a clone of the other.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("alpha", &self.has_alpha())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8() {
        let image = Image::from_rgb8(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
        assert_eq!((image.width(), image.height()), (2, 1));
        assert!(!image.has_alpha());
        assert_eq!(image, image.clone());
        assert_ne!(image, Image::from_rgb8(2, 1, vec![0; 6]).unwrap());

        let err = Image::from_rgb8(2, 2, vec![0; 6]).err().unwrap();
        assert!(err.to_string().contains("needs 12 RGB bytes, got 6"));
    }

    #[test]
    fn test_decode_png_with_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 128]))
            .save(&path)
            .unwrap();

        let logo = Image::from_path(&path).unwrap();
        assert_eq!((logo.width(), logo.height()), (4, 2));
        assert!(logo.has_alpha());

        let mut pdf = lopdf::Document::with_version("1.5");
        let id = logo.add_to(&mut pdf);
        let stream = pdf.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.content.len(), 4 * 2 * 3);
        assert_eq!(stream.content[..3], [10, 20, 30]);
        let mask = stream.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let mask = pdf.get_object(mask).unwrap().as_stream().unwrap();
        assert_eq!(mask.content, vec![128; 8]);
        assert_eq!(
            mask.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceGray"
        );
    }

    #[test]
    fn test_bad_image_data() {
        let err = Image::from_bytes(b"not an image").err().unwrap();
        assert!(err.to_string().contains("failed to decode image"));

        let dir = tempfile::tempdir().unwrap();
        let err = Image::from_path(&dir.path().join("missing.png")).err().unwrap();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let image = Image::from_rgb8(4, 1, vec![0; 12]).unwrap();
        assert_eq!(image.fit(140.0, 60.0), (140.0, 35.0));
        let image = Image::from_rgb8(1, 2, vec![0; 6]).unwrap();
        assert_eq!(image.fit(140.0, 60.0), (30.0, 60.0));
    }
}
