use crate::error::{GameError, Result};

pub const DEFAULT_MAX_THREAD: u32 = 100;

const BASE_ROOMS: usize = 8;
const ROOMS_PER_LEVEL: usize = 2;

/// Rooms along each side of the maze for `level`.
pub fn maze_rooms(level: u32) -> Result<(usize, usize)> {
    if level == 0 {
        return Err(GameError::InvalidLevel(level));
    }
    let side = BASE_ROOMS + ROOMS_PER_LEVEL * level as usize;
    Ok((side, side))
}
