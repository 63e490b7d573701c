//! Before/after analysis of React DevTools profiler exports.
//!
//! A capture is parsed ([`parsers`]), folded into per-component statistics
//! ([`aggregate`]), merged against a second capture ([`compare`]), and turned
//! into render commands ([`views`]) that any renderer can draw.

pub mod aggregate;
pub mod compare;
pub mod model;
pub mod parsers;
pub mod svg;
pub mod views;
