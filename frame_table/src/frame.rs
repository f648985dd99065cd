use core::fmt;

use static_assertions::const_assert;

/// Size of one page frame in bytes.
pub const PAGE_SIZE: usize = 4096;

const_assert!(PAGE_SIZE.is_power_of_two());

/// Address of a physical page frame.
///
/// Unique key within the frame table, totally ordered by numeric value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub usize);

/// Address of a virtual page within one process' address space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtPage(pub usize);

/// Identity of the process a frame belongs to.
///
/// An explicit integer id, so the table does not depend on the address
/// stability of any scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u32);

impl fmt::Debug for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysAddr({:#x})", self.0)
    }
}

impl fmt::Debug for VirtPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VirtPage({:#x})", self.0)
    }
}

/// One physical page frame currently backing a virtual page.
///
/// Exists in the frame table exactly as long as the physical page is
/// allocated; record and allocation are created and destroyed as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Physical page backing `page`.
    pub addr: PhysAddr,

    /// Virtual page this frame currently backs.
    pub page: VirtPage,

    /// Process that requested the frame.
    pub owner: OwnerId,
}
