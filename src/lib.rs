//! Exam seating allocation for the U-Engine ecosystem.
//!
//! Turns a roster of examinees, an optional list of relationship pairs and
//! a room catalog into a room assignment and per-room seat grid, such that
//! examinees sitting at the same date and time share no color group, room
//! diversity ceilings hold, and related examinees avoid adjacent seats.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Examinee`, `RelationshipPair`, `RoomConfig`,
//!   `RoomAllocation`, `SeatingPlan`
//! - **`graph`**: Conflict graph construction and DSatur coloring
//! - **`rooms`**: Constrained first-fit decreasing with backtracking fallback
//! - **`seating`**: Year interleaving, spread placement, adjacency avoidance
//! - **`engine`**: End-to-end pipeline, session splitting, data source, KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, degenerate rooms)
//! - **`config`**: TOML-loadable engine configuration
//! - **`error`**: Error types
//!
//! # Pipeline
//!
//! ```text
//! roster + pairs ──▶ ConflictGraph ──▶ ColorGroups ──▶ RoomAllocation ──▶ SeatingPlan
//!                     (builder)         (DSatur)        (FFD + search)     (placer)
//! ```
//!
//! # References
//!
//! - Brélaz (1979), "New methods to color the vertices of a graph"
//! - Johnson (1973), "Near-optimal bin packing algorithms"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod models;
pub mod rooms;
pub mod seating;
pub mod validation;

pub use error::{AllocationError, Result};
