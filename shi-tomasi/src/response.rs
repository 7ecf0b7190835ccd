use crate::{
    derivatives,
    image::{box_filter, GrayFloatImage},
    Corner,
};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// The smaller eigenvalue of the structure tensor `[[Σ Ix², Σ IxIy], [Σ IxIy, Σ Iy²]]` summed
/// over a `block_size × block_size` window around every pixel.
pub fn min_eigenvalue(image: &GrayFloatImage, block_size: usize) -> GrayFloatImage {
    #[cfg(not(feature = "rayon"))]
    let (dx, dy) = (
        derivatives::sobel_horizontal(image),
        derivatives::sobel_vertical(image),
    );
    #[cfg(feature = "rayon")]
    let (dx, dy) = rayon::join(
        || derivatives::sobel_horizontal(image),
        || derivatives::sobel_vertical(image),
    );

    let xx = box_filter(&dx.product(&dx), block_size);
    let xy = box_filter(&dx.product(&dy), block_size);
    let yy = box_filter(&dy.product(&dy), block_size);

    let (xx, xy, yy) = (xx.as_raw(), xy.as_raw(), yy.as_raw());
    let eigenvalue = |i: usize| {
        let half_trace = 0.5 * (xx[i] + yy[i]);
        let half_difference = 0.5 * (xx[i] - yy[i]);
        // Rounding can push the result a hair below zero on flat regions.
        (half_trace - (half_difference * half_difference + xy[i] * xy[i]).sqrt()).max(0.0)
    };
    #[cfg(not(feature = "rayon"))]
    let data: Vec<f32> = (0..xx.len()).map(eigenvalue).collect();
    #[cfg(feature = "rayon")]
    let data: Vec<f32> = (0..xx.len()).into_par_iter().map(eigenvalue).collect();

    GrayFloatImage::from_raw(image.width(), image.height(), data).unwrap_or_else(|| image.clone())
}

/// Every pixel whose response exceeds `threshold` and is not smaller than any of its 8
/// neighbors, in raster order.
pub fn local_maxima(response: &GrayFloatImage, threshold: f32) -> Vec<Corner> {
    let width = response.width();
    let height = response.height();
    let mut maxima = vec![];
    for y in 0..height {
        for x in 0..width {
            let value = response.get(x, y);
            if value <= threshold {
                continue;
            }
            let is_maximum = (y.saturating_sub(1)..(y + 2).min(height)).all(|ny| {
                (x.saturating_sub(1)..(x + 2).min(width)).all(|nx| response.get(nx, ny) <= value)
            });
            if is_maximum {
                maxima.push(Corner {
                    point: (x as f32, y as f32),
                    response: value,
                });
            }
        }
    }
    maxima
}

/// Keeps each corner, in order, unless an already kept corner lies closer than `min_distance`.
///
/// Kept corners are bucketed in a grid of `min_distance` cells so only the neighboring cells
/// have to be searched.
pub fn enforce_min_distance(
    corners: Vec<Corner>,
    min_distance: f32,
    width: usize,
    height: usize,
) -> Vec<Corner> {
    // Also rejects NaN, which would otherwise truncate to an empty cell.
    if !(min_distance > 0.0) {
        return corners;
    }
    let cell = min_distance.ceil() as usize;
    let grid_width = width / cell + 1;
    let grid_height = height / cell + 1;
    let mut grid: Vec<Vec<(f32, f32)>> = vec![vec![]; grid_width * grid_height];
    let squared = min_distance * min_distance;

    let mut kept = vec![];
    for corner in corners {
        let (x, y) = corner.point;
        let cx = x as usize / cell;
        let cy = y as usize / cell;
        let crowded = (cy.saturating_sub(1)..(cy + 2).min(grid_height)).any(|gy| {
            (cx.saturating_sub(1)..(cx + 2).min(grid_width)).any(|gx| {
                grid[gy * grid_width + gx].iter().any(|&(ox, oy)| {
                    let dx = ox - x;
                    let dy = oy - y;
                    dx * dx + dy * dy < squared
                })
            })
        });
        if !crowded {
            grid[cy * grid_width + cx].push((x, y));
            kept.push(corner);
        }
    }
    kept
}
