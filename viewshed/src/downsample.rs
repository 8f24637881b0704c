use crate::{VisibilityMask, C};
use geo::geometry::Coord;

/// Rows and columns skipped between displayed cells.
pub const DEFAULT_STRIDE: usize = 4;

/// Returns the location of every visible cell whose row and column are
/// multiples of `stride`, in row-major order.
///
/// # Panics
///
/// Panics if `stride` is zero.
pub fn downsample(mask: &VisibilityMask, stride: usize) -> Vec<Coord<C>> {
    assert!(stride > 0, "stride must be non-zero");
    let georef = mask.georef();
    (0..mask.height())
        .step_by(stride)
        .flat_map(|y| (0..mask.width()).step_by(stride).map(move |x| (x, y)))
        .filter(|&xy| mask.get_xy(xy))
        .map(|xy| georef.xy_to_coord(xy))
        .collect()
}

/// Display radius (meters) for each point produced by [`downsample`].
///
/// 100 m at the default stride.
#[allow(clippy::cast_precision_loss)]
pub fn marker_radius_m(stride: usize) -> C {
    25.0 * stride as C
}

#[cfg(test)]
mod tests {
    use super::{downsample, marker_radius_m, DEFAULT_STRIDE};
    use crate::{Georef, VisibilityMask};
    use geo::geometry::{Coord, Rect};

    fn mask(width: usize, height: usize, visible: impl Fn(usize, usize) -> bool) -> VisibilityMask {
        let georef = Georef::new(
            width,
            height,
            Rect::new(Coord { x: 10.0, y: 40.0 }, Coord { x: 11.0, y: 41.0 }),
        );
        let cells = (0..width * height)
            .map(|idx| {
                let (x, y) = georef.linear_index_to_xy(idx);
                visible(x, y)
            })
            .collect();
        VisibilityMask::new(georef, cells)
    }

    #[test]
    fn test_all_visible() {
        let mask = mask(16, 12, |_, _| true);
        let points = downsample(&mask, DEFAULT_STRIDE);
        assert_eq!(points.len(), 4 * 3);
        assert_eq!(points[0], mask.georef().xy_to_coord((0, 0)));
        assert_eq!(points[1], mask.georef().xy_to_coord((4, 0)));
        assert_eq!(points[4], mask.georef().xy_to_coord((0, 4)));
    }

    #[test]
    fn test_points_are_visible_stride_cells() {
        let mask = mask(37, 23, |x, y| (x * 7 + y * 3) % 5 != 0);
        let georef = *mask.georef();
        for stride in [1, 2, 3, 4, 10] {
            let points = downsample(&mask, stride);
            let expected: Vec<_> = (0..23)
                .flat_map(|y| (0..37).map(move |x| (x, y)))
                .filter(|&(x, y)| x % stride == 0 && y % stride == 0)
                .filter(|&xy| mask.get_xy(xy))
                .map(|xy| georef.xy_to_coord(xy))
                .collect();
            assert_eq!(points, expected);
        }
        assert_eq!(downsample(&mask, 1).len(), mask.visible_count());
    }

    #[test]
    fn test_nothing_visible() {
        let mask = mask(8, 8, |_, _| false);
        assert!(downsample(&mask, 2).is_empty());
    }

    #[test]
    fn test_stride_larger_than_mask() {
        let mask = mask(3, 3, |_, _| true);
        assert_eq!(downsample(&mask, 10), vec![mask.georef().xy_to_coord((0, 0))]);
    }

    #[test]
    #[should_panic(expected = "stride must be non-zero")]
    fn test_zero_stride() {
        downsample(&mask(2, 2, |_, _| true), 0);
    }

    #[test]
    fn test_marker_radius() {
        assert_eq!(marker_radius_m(DEFAULT_STRIDE), 100.0);
        assert_eq!(marker_radius_m(1), 25.0);
    }
}
