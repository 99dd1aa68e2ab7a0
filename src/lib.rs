//! Ariadne's maze: walk from the entry to the exit of a generated maze
//! while unwinding a limited length of thread behind you. Stepping back
//! along the thread winds it up again.

pub mod config;
pub mod error;
pub mod input;
pub mod level;
pub mod maze;
pub mod render;
pub mod session;
pub mod thread;

pub use error::{GameError, Result};
pub use maze::{Cell, Dir, Grid, Pos};
pub use session::{MoveOutcome, Session, Snapshot, Status};
