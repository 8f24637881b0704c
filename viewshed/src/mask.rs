use crate::{engine::VisibilityMaskBuilder, Georef, C};
use geo::geometry::Rect;

/// Per-cell visibility of an [`ElevationGrid`](crate::ElevationGrid).
///
/// Shares its dimensions and extent with the grid it was computed
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityMask {
    georef: Georef,

    /// Row-major visibility, starting at the north-west corner.
    visible: Box<[bool]>,
}

impl VisibilityMask {
    pub fn builder() -> VisibilityMaskBuilder {
        VisibilityMaskBuilder::default()
    }

    pub(crate) fn new(georef: Georef, visible: Vec<bool>) -> Self {
        assert_eq!(visible.len(), georef.len());
        Self {
            georef,
            visible: visible.into_boxed_slice(),
        }
    }

    pub fn georef(&self) -> &Georef {
        &self.georef
    }

    pub fn width(&self) -> usize {
        self.georef.width()
    }

    pub fn height(&self) -> usize {
        self.georef.height()
    }

    pub fn bbox(&self) -> Rect<C> {
        self.georef.bbox()
    }

    pub fn visible(&self) -> &[bool] {
        &self.visible
    }

    /// Returns whether cell `(x, y)` can see the observer.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the mask.
    pub fn get_xy(&self, (x, y): (usize, usize)) -> bool {
        assert!(x < self.width() && y < self.height());
        self.visible[self.georef.xy_to_linear_index((x, y))]
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|&&visible| visible).count()
    }
}
