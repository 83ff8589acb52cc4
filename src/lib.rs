pub mod aggregate;
pub mod cli;
pub mod covdir;
pub mod error;
pub mod filter;
pub mod model;
pub mod provenance;
pub mod remap;
pub mod report;
pub mod revision;
