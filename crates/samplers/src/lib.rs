//! Adaptive samplers built on the [`tessel_core::Sampler`] contract.
//!
//! # Samplers
//!
//! - [`average`] - estimates the mean of a stochastic function over integer
//!   seeds until the standard error meets the requested tolerances
//! - [`interval`] - refines a function of one real variable, splitting the
//!   intervals whose rescaled segment length is largest
//! - [`triangle`] - refines a function of two real variables over a Delaunay
//!   triangulation, placing points inside the triangles that deviate most
//!   from a linear fit
//! - [`balancing`] - shares one budget across many samplers of the same type
//!   by greedily picking the single best point among them

mod coord;

pub mod average;
pub mod balancing;
pub mod interval;
pub mod triangle;

pub use average::AverageSampler;
pub use balancing::BalancingSampler;
pub use interval::IntervalSampler;
pub use triangle::TriangleSampler;
