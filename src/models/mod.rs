pub mod file_entry;
pub mod git_status;
