//! Pass combinators: ways to build bigger [`crate::pass::Pass`]es out of
//! smaller ones.
//!
//! Every combinator here holds its sub-passes as owned, boxed [`Pass`]
//! trait objects and exposes them through [`Pass::children_mut`], so cache
//! propagation and verbose cascading reach arbitrarily nested combinator
//! trees for free.

mod chain;
mod filter;
mod fixed_point;
mod match_;

pub use chain::Chain;
pub use filter::Filter;
pub use fixed_point::FixedPoint;
pub use match_::Match;
