pub mod logging;

pub mod inventory;
pub mod tags;
