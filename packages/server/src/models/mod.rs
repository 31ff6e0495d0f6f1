pub mod permission;
pub mod shared;
