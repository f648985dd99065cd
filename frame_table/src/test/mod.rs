use static_assertions::assert_impl_all;

use crate::{
    modules::{
        physical_memory::PoolPhysicalMemoryModule,
        replacement::NruReplacementPolicy,
        swap::{test::get_test_swap, FileSwapModule, SwapModule},
    },
    FrameManager, PhysAddr,
};


pub(crate) type TestManager = FrameManager<PoolPhysicalMemoryModule, FileSwapModule, NruReplacementPolicy>;

assert_impl_all!(TestManager: Send, Sync);

pub(crate) const TEST_POOL_BASE: PhysAddr = PhysAddr(0x1000_0000);

pub(crate) fn get_test_manager(test_name: &str, frames: usize) -> TestManager {
    let _ = env_logger::builder().is_test(true).try_init();

    let pool = PoolPhysicalMemoryModule::new(TEST_POOL_BASE, frames);
    FrameManager::new(pool, get_test_swap(test_name))
}

pub(crate) fn manager_with_swap<S: SwapModule>(
    frames: usize,
    swap: S,
) -> FrameManager<PoolPhysicalMemoryModule, S, NruReplacementPolicy> {
    let _ = env_logger::builder().is_test(true).try_init();

    FrameManager::new(PoolPhysicalMemoryModule::new(TEST_POOL_BASE, frames), swap)
}
