pub mod aggregate;
pub mod config;
pub mod controller;
pub mod copy;
pub mod errors;
pub mod export;
pub mod fetcher;
pub mod history;
pub mod ignore;
pub mod logger;
pub mod model;
pub mod reader;
pub mod reporting;
pub mod server;
pub mod session;
pub mod shell;
pub mod source;
pub mod tokens;
pub mod tree;
pub mod trie;
pub mod utils;

pub use copy::copy_bundle;
pub use errors::BundleError;
pub use ignore::ExclusionPolicy;
pub use tree::DirectoryEntry;
