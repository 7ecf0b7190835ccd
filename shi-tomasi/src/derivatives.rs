use crate::image::{separable_filter, GrayFloatImage};

/// The horizontal Sobel derivative, similar to cv::Sobel with xorder=1, yorder=0, ksize=3.
pub fn sobel_horizontal(image: &GrayFloatImage) -> GrayFloatImage {
    GrayFloatImage(separable_filter(&image.0, &[-1., 0., 1.], &[1., 2., 1.]))
}

/// The vertical Sobel derivative, similar to cv::Sobel with xorder=0, yorder=1, ksize=3.
pub fn sobel_vertical(image: &GrayFloatImage) -> GrayFloatImage {
    GrayFloatImage(separable_filter(&image.0, &[1., 2., 1.], &[-1., 0., 1.]))
}
