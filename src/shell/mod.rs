pub mod git;
pub mod safety;
