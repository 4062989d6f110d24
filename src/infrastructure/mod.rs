pub mod classifier;
pub mod logging;
pub mod storage;
