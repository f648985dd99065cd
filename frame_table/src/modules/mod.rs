pub mod address_space;
pub mod physical_memory;
pub mod replacement;
pub mod swap;
