//! Image decoding and preprocessing

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage, ImageReader};
use ndarray::Array3;
use std::path::Path;

use super::pipeline::Loader;
use crate::config::{IMAGENET_MEAN, IMAGENET_STD};
use crate::core::MediaType;

/// Decodes an image and turns it into a normalized `3 × size × size` tensor.
#[derive(Debug, Clone, Copy)]
pub struct ImageLoader {
	input_size: u32,
}

impl ImageLoader {
	pub fn new(input_size: u32) -> Self {
		Self { input_size }
	}
}

impl Loader for ImageLoader {
	type Sample = Array3<f32>;

	fn media_type(&self) -> MediaType {
		MediaType::Image
	}

	fn load(&self, path: &Path) -> Result<Array3<f32>> {
		// Content sniffing handles mislabeled files
		let img = ImageReader::open(path)
			.context("Open failed")?
			.with_guessed_format()
			.context("Format detection failed")?
			.decode()
			.context("Decode failed")?;

		Ok(preprocess(&img, self.input_size))
	}
}

pub fn preprocess(img: &DynamicImage, input_size: u32) -> Array3<f32> {
	let resized = img.resize_exact(input_size, input_size, FilterType::CatmullRom);
	let rgb = resized.to_rgb8();
	let size = input_size as usize;

	let mut arr = Array3::zeros((3, size, size));
	for (x, y, px) in rgb.enumerate_pixels() {
		let (x, y) = (x as usize, y as usize);
		for c in 0..3 {
			arr[[c, y, x]] = (px[c] as f32 / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
		}
	}
	arr
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgb, RgbImage};
	use tempfile::TempDir;

	#[test]
	fn preprocess_resizes_and_normalizes_per_channel() {
		let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 6, Rgb([255, 0, 128])));
		let arr = preprocess(&img, 4);

		assert_eq!(arr.shape(), &[3, 4, 4]);
		let red = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
		let green = (0.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
		assert!((arr[[0, 2, 3]] - red).abs() < 0.05);
		assert!((arr[[1, 0, 0]] - green).abs() < 0.05);
	}

	#[test]
	fn load_sniffs_content_and_rejects_garbage() {
		let dir = TempDir::new().unwrap();
		let good = dir.path().join("actually_png.jpg");
		RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]))
			.save_with_format(&good, image::ImageFormat::Png)
			.unwrap();
		let bad = dir.path().join("broken.jpg");
		std::fs::write(&bad, b"definitely not an image").unwrap();

		let loader = ImageLoader::new(16);
		assert_eq!(loader.load(&good).unwrap().shape(), &[3, 16, 16]);
		assert!(loader.load(&bad).is_err());
	}
}
