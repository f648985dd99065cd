mod dummy;
mod file_swap;

pub use dummy::DummySwapModule;
pub use file_swap::FileSwapModule;

use crate::frame::{OwnerId, VirtPage};

/// Backing-store writer used during eviction.
pub trait SwapModule {
    /// Durably persists the content of `page` before its frame is reused.
    ///
    /// On `Err` the eviction of that frame must be aborted; reusing the
    /// frame anyway would silently drop the only copy of the page.
    fn persist(&mut self, owner: OwnerId, page: VirtPage) -> Result<(), ()>;
}
