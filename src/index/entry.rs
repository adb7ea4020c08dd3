use mapmatch_geo::{Road, RoadId};

use rstar::{AABB, PointDistance, RTreeObject};

/// Position type stored within the index, as `[x, y]`.
pub type IndexPoint = [f64; 2];

/// An entry of the [`RoadIndex`](crate::RoadIndex), mapping a road's
/// bounding box to its identifier and the slot holding its geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadEntry {
    pub id: RoadId,
    pub(crate) slot: usize,
    envelope: AABB<IndexPoint>,
}

impl RoadEntry {
    /// Creates the entry for a road, `None` if the road has no positions.
    pub(crate) fn new(road: &Road, slot: usize) -> Option<Self> {
        let bounds = road.bounds()?;
        let (min, max) = (bounds.min(), bounds.max());

        Some(RoadEntry {
            id: road.id(),
            slot,
            envelope: AABB::from_corners([min.x, min.y], [max.x, max.y]),
        })
    }

    #[inline]
    pub fn bounds(&self) -> &AABB<IndexPoint> {
        &self.envelope
    }
}

impl RTreeObject for RoadEntry {
    type Envelope = AABB<IndexPoint>;

    #[inline]
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for RoadEntry {
    /// Squared distance to the bounding box of the road, not its geometry.
    #[inline]
    fn distance_2(&self, point: &IndexPoint) -> f64 {
        self.envelope.distance_2(point)
    }
}
