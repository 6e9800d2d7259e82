pub mod file_service;
pub mod git_service;
pub mod tree_service;
