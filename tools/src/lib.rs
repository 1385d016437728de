//! # Winston Tools
//!
//! The function-calling surface of the Winston agent. Every tool takes JSON
//! arguments and answers with a [`ToolResult`] envelope, so a failure is
//! always a message for the model and never a crash.
//!
//! ## Tools
//!
//! 1. **Encyclopedia search**: semantic lookup over the embedded encyclopedia
//! 2. **Distance**: Euclidean distance between two heliocentric positions
//! 3. **Gravity**: Newtonian attraction between the spacecraft and a body
//! 4. **Travel time**: journey duration at constant speed
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Winston Tools                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ToolRegistry ──► Tool ──► ToolResult                           │
//! │       │            │                                            │
//! │       ▼            ▼                                            │
//! │   ToolSpec   EncyclopediaSearch ──► winston_embeddings          │
//! │              space_calculator                                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod registry;
pub mod result;
pub mod space_calculator;
pub mod spec;
pub mod tool;
pub mod vector_search;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use space_calculator::{
    Coordinates, DistanceReport, DistanceTool, DistanceUnit, GravityReport, GravityTool,
    TravelTimeReport, TravelTimeTool, calculate_distance, calculate_gravity,
    calculate_travel_time,
};
pub use spec::{DataType, InputConstraints, ToolInput, ToolSpec};
pub use tool::{Tool, parse_args};
pub use vector_search::{DEFAULT_TOP_K, EncyclopediaSearch, SearchArgs};
