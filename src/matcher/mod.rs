//! Assigning the positions of a trace to the roads of an index.
//!
//! Two strategies implement the common [`Matcher`] capability:
//!
//! - [`LineSnapMatcher`], which snaps each position to its nearest road.
//! - [`LcssMatcher`], which aligns the whole trace against the network,
//!   favouring continuous runs along connected roads.
//!
//! Both produce a [`MatchResult`], holding one [`Match`] per position
//! in trace order. Any matcher can also match many traces in parallel,
//! see [`BatchMatch`].

#[doc(hidden)]
pub mod batch;
#[doc(hidden)]
pub mod deadline;
#[doc(hidden)]
pub mod definition;
#[doc(hidden)]
pub mod error;
pub mod lcss;
#[doc(hidden)]
pub mod result;
#[doc(hidden)]
pub mod snap;
#[cfg(test)]
mod test;

#[doc(inline)]
pub use batch::BatchMatch;
#[doc(inline)]
pub use deadline::Deadline;
#[doc(inline)]
pub use definition::Matcher;
#[doc(inline)]
pub use error::MatchError;
#[doc(inline)]
pub use lcss::{LcssConfig, LcssMatcher};
#[doc(inline)]
pub use result::{Match, MatchResult};
#[doc(inline)]
pub use snap::{LineSnapMatcher, SnapConfig};
