pub mod branch;
pub mod config;

pub use branch::{Branch, CreateBranchRequest, Detail};
pub use config::AppConfig;
