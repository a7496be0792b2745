//! Vision model (ONNX) for image embeddings

use anyhow::{bail, Context, Result};
use ndarray::Array3;
use ort::session::Session;
use std::path::Path;

use super::Embedder;
use crate::config::ImageSettings;

pub struct VisionModel {
	session: Session,
	input_name: String,
	output_name: String,
}

impl VisionModel {
	pub fn load(settings: &ImageSettings) -> Result<Self> {
		let model_path: &Path = &settings.model_path;
		if !model_path.exists() {
			bail!("Vision model file does not exist: {}", model_path.display());
		}

		let session = crate::runtime::create_session(model_path)
			.context("Failed to load vision model")?;

		Ok(Self {
			session,
			input_name: settings.input_name.clone(),
			output_name: settings.output_name.clone(),
		})
	}
}

impl Embedder for VisionModel {
	type Sample = Array3<f32>;

	fn embed(&mut self, batch: &[Array3<f32>]) -> Result<Vec<Vec<f32>>> {
		let Some(first) = batch.first() else {
			return Ok(Vec::new());
		};

		let (shape, data) = stack(first.shape(), batch)?;
		let input = ort::value::Value::from_array((shape, data))?;

		let outputs = self
			.session
			.run(ort::inputs![self.input_name.as_str() => input])
			.context("Inference failed")?;

		let output = outputs
			.get(self.output_name.as_str())
			.with_context(|| format!("Model has no output named {:?}", self.output_name))?;
		let (shape, data) = output.try_extract_tensor::<f32>()?;
		let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

		split_rows(data, &dims)
	}
}

/// Packs same-shaped CHW samples into one NCHW buffer.
fn stack(sample_shape: &[usize], batch: &[Array3<f32>]) -> Result<(Vec<usize>, Vec<f32>)> {
	let per_sample: usize = sample_shape.iter().product();
	let mut data = Vec::with_capacity(per_sample * batch.len());

	for sample in batch {
		if sample.shape() != sample_shape {
			bail!("Sample shape {:?} differs from {:?}", sample.shape(), sample_shape);
		}
		data.extend(sample.iter().copied());
	}

	let mut shape = Vec::with_capacity(sample_shape.len() + 1);
	shape.push(batch.len());
	shape.extend_from_slice(sample_shape);
	Ok((shape, data))
}

/// Splits a `[N, ...]` output into N flat vectors.
fn split_rows(data: &[f32], dims: &[usize]) -> Result<Vec<Vec<f32>>> {
	let Some(&rows) = dims.first() else {
		bail!("Scalar model output");
	};
	if rows == 0 {
		return Ok(Vec::new());
	}
	if data.len() % rows != 0 {
		bail!("Output of {} values does not split into {} rows", data.len(), rows);
	}

	let width = data.len() / rows;
	Ok(data.chunks(width).map(<[f32]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stack_prepends_batch_dimension() {
		let a = Array3::from_elem((3, 2, 2), 1.0f32);
		let b = Array3::from_elem((3, 2, 2), 2.0f32);
		let (shape, data) = stack(a.shape(), &[a.clone(), b]).unwrap();

		assert_eq!(shape, vec![2, 3, 2, 2]);
		assert_eq!(data.len(), 24);
		assert!(data[..12].iter().all(|&v| v == 1.0));
		assert!(data[12..].iter().all(|&v| v == 2.0));
	}

	#[test]
	fn stack_rejects_mixed_shapes() {
		let a = Array3::<f32>::zeros((3, 2, 2));
		let b = Array3::<f32>::zeros((3, 4, 4));
		assert!(stack(a.shape(), &[a.clone(), b]).is_err());
	}

	#[test]
	fn split_rows_flattens_trailing_dimensions() {
		let data: Vec<f32> = (0..8).map(|v| v as f32).collect();
		let rows = split_rows(&data, &[2, 4, 1, 1]).unwrap();
		assert_eq!(rows, vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]]);
		assert!(split_rows(&data, &[3, 2]).is_err());
	}
}
