mod frame;
mod frame_manager;
mod frame_table;

pub mod modules;

#[cfg(test)]
mod test;

pub use crate::frame::{Frame, OwnerId, PhysAddr, VirtPage, PAGE_SIZE};
pub use crate::frame_manager::{FrameError, FrameManager, FrameManagerConfig, Result};
pub use crate::frame_table::FrameTable;
