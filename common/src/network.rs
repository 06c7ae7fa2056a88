pub mod hwaddr;
pub mod range;
