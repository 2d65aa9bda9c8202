pub mod environment;
pub mod interface;
pub mod subnet;
