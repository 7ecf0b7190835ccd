use derive_more::{Deref, DerefMut};
use image::{DynamicImage, ImageBuffer, Luma};
use log::*;

pub(crate) type GrayImageBuffer = ImageBuffer<Luma<f32>, Vec<f32>>;

/// A single channel image of `f32` intensities between 0 and 1.
///
/// The `image` crate is only used to load images and convert them to this representation.
/// The filters below work on the raw row-major buffer.
#[derive(Debug, Clone, Deref, DerefMut)]
pub struct GrayFloatImage(pub GrayImageBuffer);

impl GrayFloatImage {
    /// Create a unit float image from the image crate's DynamicImage type.
    pub fn from_dynamic(input_image: &DynamicImage) -> Self {
        info!(
            "Loaded a {} x {} image of color type {:?}",
            input_image.width(),
            input_image.height(),
            input_image.color()
        );
        Self(input_image.to_luma32f())
    }

    /// Wraps a row-major buffer. Returns `None` if the buffer is too small.
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Option<Self> {
        GrayImageBuffer::from_raw(width as u32, height as u32, data).map(Self)
    }

    pub fn width(&self) -> usize {
        self.0.width() as usize
    }

    pub fn height(&self) -> usize {
        self.0.height() as usize
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.0.as_raw()[y * self.width() + x]
    }

    /// Multiplies two images of the same size pixel by pixel.
    pub fn product(&self, other: &Self) -> Self {
        let data = self
            .0
            .as_raw()
            .iter()
            .zip(other.0.as_raw())
            .map(|(a, b)| a * b)
            .collect();
        Self(GrayImageBuffer::from_raw(self.0.width(), self.0.height(), data).unwrap_or_default())
    }
}

/// Convolves every row with `kernel`, replicating the edge pixels.
pub fn horizontal_filter(image: &GrayImageBuffer, kernel: &[f32]) -> GrayImageBuffer {
    debug_assert!(kernel.len() % 2 == 1);
    let half = kernel.len() / 2;
    let width = image.width() as usize;
    let height = image.height() as usize;
    if width == 0 || height == 0 {
        return image.clone();
    }
    let mut output = vec![0.0; width * height];
    // Pad each row with copies of its edge values so the kernel never leaves the buffer.
    let mut scratch = vec![0f32; width + 2 * half];
    for (row_in, row_out) in image
        .as_raw()
        .chunks_exact(width)
        .zip(output.chunks_exact_mut(width))
    {
        scratch[..half].fill(row_in[0]);
        scratch[half..half + width].copy_from_slice(row_in);
        scratch[half + width..].fill(row_in[width - 1]);
        for (window, out) in scratch.windows(kernel.len()).zip(row_out) {
            *out = window.iter().zip(kernel).map(|(a, b)| a * b).sum();
        }
    }
    GrayImageBuffer::from_raw(width as u32, height as u32, output).unwrap_or_default()
}

/// Convolves every column with `kernel`, replicating the edge pixels.
pub fn vertical_filter(image: &GrayImageBuffer, kernel: &[f32]) -> GrayImageBuffer {
    debug_assert!(kernel.len() % 2 == 1);
    let half = kernel.len() as isize / 2;
    let width = image.width() as usize;
    let height = image.height() as usize;
    if width == 0 || height == 0 {
        return image.clone();
    }
    let data = image.as_raw();
    let mut output = vec![0.0; width * height];
    for (y, row_out) in output.chunks_exact_mut(width).enumerate() {
        for (k, &weight) in kernel.iter().enumerate() {
            let source = (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
            let row_in = &data[source * width..(source + 1) * width];
            for (out, &pixel) in row_out.iter_mut().zip(row_in) {
                *out += weight * pixel;
            }
        }
    }
    GrayImageBuffer::from_raw(width as u32, height as u32, output).unwrap_or_default()
}

pub fn separable_filter(
    image: &GrayImageBuffer,
    h_kernel: &[f32],
    v_kernel: &[f32],
) -> GrayImageBuffer {
    let h = horizontal_filter(image, h_kernel);
    vertical_filter(&h, v_kernel)
}

/// Sums every pixel over a `size × size` window centered on it.
pub fn box_filter(image: &GrayFloatImage, size: usize) -> GrayFloatImage {
    let kernel = vec![1.0; size];
    GrayFloatImage(separable_filter(image, &kernel, &kernel))
}
