use mapmatch_geo::{Crs, Road, RoadId};

/// Capability of a road network which can be matched against.
///
/// The network need only enumerate its roads and look them up by
/// identifier. Any source, such as a graph library or a file format,
/// may implement this to be indexed by [`RoadIndex`](crate::RoadIndex).
pub trait RoadMap {
    /// The reference system every road geometry is expressed in.
    fn crs(&self) -> Crs;

    /// An iterator over every road within the network.
    ///
    /// The order of iteration must be stable across calls, since it
    /// is used to build the index deterministically.
    fn roads(&self) -> impl Iterator<Item = &Road>;

    /// Looks up a single road by its identifier.
    fn road(&self, id: RoadId) -> Option<&Road>;

    /// The number of roads within the network.
    fn len(&self) -> usize {
        self.roads().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
