use frame_table::{
    modules::{
        address_space::BitTableAddressSpace, physical_memory::PoolPhysicalMemoryModule,
        replacement::NruReplacementPolicy, swap::FileSwapModule,
    },
    FrameManager, OwnerId, PhysAddr, VirtPage, PAGE_SIZE,
};
use log::info;

const POOL_FRAMES: usize = 4;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Trace)
        .init();

    let pool = PoolPhysicalMemoryModule::new(PhysAddr(0x1000_0000), POOL_FRAMES);
    let swap = FileSwapModule::new("/tmp/evict_example.swap".to_string()).unwrap();
    let manager: FrameManager<_, _, NruReplacementPolicy> = FrameManager::new(pool, swap);

    let owner = OwnerId(1);
    let mut aspace = BitTableAddressSpace::new();

    // fill the pool
    for i in 0..POOL_FRAMES {
        let page = VirtPage(0x1000 + i * PAGE_SIZE);
        let addr = manager.acquire(&mut aspace, owner, page, false).unwrap();
        info!("{:?} now backed by {:?}", page, addr);
    }

    // one page stays hot and dirty, one is merely read
    aspace.write(VirtPage(0x1000));
    aspace.touch(VirtPage(0x1000 + PAGE_SIZE));

    // the next acquire has to reclaim one of the cold frames
    let page = VirtPage(0x9000);
    let addr = manager.acquire(&mut aspace, owner, page, false).unwrap();
    info!("{:?} backed by {:?} after eviction", page, addr);

    info!(
        "{} frames live, {} physical frames free",
        manager.frame_count(),
        manager.remaining_physical()
    );
}
