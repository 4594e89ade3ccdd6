//! CLI commands

mod pages_to_workers;

pub use pages_to_workers::PagesToWorkersCommand;
