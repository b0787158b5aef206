//! WorldRoad - reveal the world along your tracks!
//!
//! The core of a fog-of-war travel map: recorded tracks are reduced to
//! screen-pixel polylines under the live map projection, turned into closed
//! ribbon paths, and composited above the map on every frame tick — either
//! as plain strokes, or by erasing traveled paths out of an opaque fog
//! layer. The hosting map widget is modeled by three narrow collaborator
//! traits supplying the projection, the drawable surface and the frame
//! ticks.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cli;
pub mod config;
pub mod geometry;
pub mod render;
pub mod tracks;
