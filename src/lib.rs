pub mod config;
pub mod master;
pub mod replication;
pub mod secondary;
pub mod util;
