//! Pixel-space and geo-space coordinate types shared by the
//! chunking and combination modules.

use nalgebra::{Matrix3, Point2};
use serde_derive::Serialize;

/// Dimensions of a raster window as `(width, height)`.
pub type RasterDims = (usize, usize);
/// Offset of a raster window as `(x, y)`.
pub type RasterOffset = (isize, isize);
/// A raster window as `(offset, dimensions)`.
pub type RasterWindow = (RasterOffset, RasterDims);

/// Affine geotransform in GDAL coefficient order:
/// `[origin_x, pixel_width, row_rotation,
///   origin_y, col_rotation, pixel_height]`.
pub type GeoTransform = [f64; 6];

/// Geotransform of a raster with no georeferencing.
pub const IDENTITY_TRANSFORM: GeoTransform = [0., 1., 0., 0., 0., 1.];

/// Homogeneous affine transform from pixel to geo
/// coordinates.
pub type PixelTransform = Matrix3<f64>;

/// Build a [`PixelTransform`] from GDAL-order geotransform
/// coefficients.
pub fn transform_from_gdal(t: &GeoTransform) -> PixelTransform {
    Matrix3::new(
        t[1], t[2], t[0], //
        t[4], t[5], t[3], //
        0., 0., 1.,
    )
}

/// Read the [`PixelTransform`] of a dataset, falling back
/// to the identity when it carries no georeferencing.
#[cfg(feature = "gdal")]
pub fn transform_from_dataset(ds: &gdal::Dataset) -> PixelTransform {
    transform_from_gdal(&ds.geo_transform().unwrap_or(IDENTITY_TRANSFORM))
}

/// Geospatial bounding box with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl GeoBounds {
    /// Bounding box of a pixel window under the given
    /// transform. All four corners are mapped and the
    /// extrema taken, so the result is normalized for
    /// north-up rasters (negative pixel height) as well as
    /// rotated transforms.
    pub fn of_window(t: &PixelTransform, off: RasterOffset, size: RasterDims) -> Self {
        let (x0, y0) = (off.0 as f64, off.1 as f64);
        let (x1, y1) = (x0 + size.0 as f64, y0 + size.1 as f64);

        let corners = [
            t.transform_point(&Point2::new(x0, y0)),
            t.transform_point(&Point2::new(x1, y0)),
            t.transform_point(&Point2::new(x0, y1)),
            t.transform_point(&Point2::new(x1, y1)),
        ];

        let mut bounds = GeoBounds {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for pt in &corners {
            bounds.min_x = bounds.min_x.min(pt.x);
            bounds.max_x = bounds.max_x.max(pt.x);
            bounds.min_y = bounds.min_y.min(pt.y);
            bounds.max_y = bounds.max_y.max(pt.y);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_bounds() {
        let t = transform_from_gdal(&IDENTITY_TRANSFORM);
        let b = GeoBounds::of_window(&t, (2, 3), (4, 5));
        assert_eq!(
            b,
            GeoBounds {
                min_x: 2.,
                max_x: 6.,
                min_y: 3.,
                max_y: 8.,
            }
        );
    }

    #[test]
    fn north_up_bounds() {
        // North-up raster: negative pixel height.
        let t = transform_from_gdal(&[100., 10., 0., 200., 0., -10.]);
        let b = GeoBounds::of_window(&t, (0, 0), (4, 4));
        assert_eq!(
            b,
            GeoBounds {
                min_x: 100.,
                max_x: 140.,
                min_y: 160.,
                max_y: 200.,
            }
        );
    }
}
