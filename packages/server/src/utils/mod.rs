pub mod flash;
pub mod listing;
