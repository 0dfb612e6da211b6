pub mod cli;
pub mod combat;
pub mod parallel;
pub mod server;
