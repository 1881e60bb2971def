//! # Voxel World Core
//!
//! Everything that describes the world itself: what a block is, how blocks are
//! grouped into chunks, how chunks are stored and found again, how terrain is
//! produced and how light floods through it.
//!
//! ## Architecture
//!
//! * **Block**: block types, their static properties and per-block light
//! * **Chunk**: fixed 16³ arrays of blocks and the coordinate types that address them
//! * **World**: the chunk store, keyed by chunk position, one lock per chunk
//! * **Terrain**: pure generators turning a chunk position into a filled chunk
//! * **Lighting**: sunlight and block light seeding plus BFS flood fill
//! * **Edit**: breaking and placing blocks with incremental relight
//! * **Tasks**: column generation jobs run on the worker pool
//!
//! ## Data Flow
//!
//! 1. The engine asks the worker pool for a chunk column
//! 2. The task generates the missing chunks without holding any lock
//! 3. Chunks are inserted under the grid write lock, then lit under the read lock
//! 4. The set of chunks whose light changed comes back as remesh requests
//!
//! ## Thread Safety
//!
//! The grid map sits behind one `RwLock` and every chunk behind its own.
//! Light passes and edits hold the grid read guard and at most one chunk
//! guard at a time, so they never deadlock against each other or against
//! streaming.

pub mod block;
pub mod chunk;
pub mod edit;
pub mod lighting;
pub mod tasks;
pub mod terrain;
pub mod world;
