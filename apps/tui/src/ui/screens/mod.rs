pub mod help;
pub mod lots;
pub mod map;
