use crate::frame::{OwnerId, VirtPage};

use super::SwapModule;

/// Placeholder for setups where eviction must never run.
pub struct DummySwapModule;

impl SwapModule for DummySwapModule {
    fn persist(&mut self, _owner: OwnerId, _page: VirtPage) -> Result<(), ()> {
        panic!("not implemented")
    }
}
