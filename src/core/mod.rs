//! # Core Module
//!
//! Fundamental concurrency primitives shared by the rest of the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking.
//!   The world grid and every chunk it owns are each wrapped in one, which gives
//!   the engine a two-level lock hierarchy: the grid lock guards the set of
//!   loaded chunks, a chunk lock guards the blocks of that chunk.
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
