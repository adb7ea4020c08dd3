//! The road network a trace is matched against.

#[doc(hidden)]
pub mod definition;
#[doc(hidden)]
pub mod memory;

#[doc(inline)]
pub use definition::RoadMap;
#[doc(inline)]
pub use memory::InMemoryMap;
