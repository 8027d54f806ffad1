/*!
paperfold
=========

**paperfold** is a deterministic geometry engine for simulating layered
paper folding on a triangulated flat sheet.

Given a stack of layered triangular panels and a straight fold line, the
engine splits every panel the line crosses so the fold boundary is exactly
represented, reassigns stacking order to the folded half, generates thin
crease quads standing in for the paper's edge thickness, and drives a
continuous rotation of the folded half from 0 to 180 degrees while keeping
crease-adjacent vertices glued to the fold line.

Rendering, input handling and per-frame scheduling are left to the caller:
the engine exposes pure geometric state ([`shape::Sheet`]) and the fold
pipeline ([`fold::FoldEngine`]).
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::manual_range_contains)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;

pub extern crate nalgebra as na;

pub mod fold;
pub mod math;
pub mod query;
pub mod shape;
pub mod utils;
