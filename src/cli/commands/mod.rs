pub mod daemon;
pub mod transaction;
