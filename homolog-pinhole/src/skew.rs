use homolog_core::nalgebra::{Matrix3, Vector3};

/// The skew-symmetric matrix `[v]×` which turns the cross product with `v` into a linear map.
///
/// For any `w`, `cross_product_matrix(&v) * w == v.cross(&w)`.
///
/// ```
/// use homolog_core::nalgebra::Vector3;
/// use homolog_pinhole::cross_product_matrix;
/// let v = Vector3::new(1.0, -2.0, 3.0);
/// let w = Vector3::new(0.5, 4.0, -1.0);
/// assert_eq!(cross_product_matrix(&v) * w, v.cross(&w));
/// ```
#[rustfmt::skip]
pub fn cross_product_matrix(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0,   -v.z,   v.y,
        v.z,    0.0,  -v.x,
       -v.y,    v.x,   0.0,
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn is_skew_symmetric() {
        let v = Vector3::new(0.3, 7.0, -2.5);
        let m = cross_product_matrix(&v);
        assert_eq!(m.transpose(), -m);
        assert_eq!(m * v, Vector3::zeros());
    }
}
