// Library interface for newsflow modules
// This allows tests and other binaries to import modules

pub mod classifier;
pub mod pipeline;
pub mod server;
pub mod storage;
