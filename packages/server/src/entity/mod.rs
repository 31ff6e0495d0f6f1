pub mod group;
pub mod permission;
pub mod permission_group;
pub mod permission_role;
pub mod permission_user;
pub mod role;
pub mod user;
