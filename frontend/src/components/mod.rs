pub mod controls;
pub mod handlers;
pub mod header;
pub mod preview;
pub mod results;
pub mod utils;
