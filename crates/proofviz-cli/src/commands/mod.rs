pub mod ancestors;
pub mod build;
pub mod consequences;
pub mod descendants;
pub mod lines;
pub mod replay;
