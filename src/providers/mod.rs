pub mod file_provider;
pub mod http_provider;
pub mod loader;
pub mod retry;

pub use file_provider::FileProvider;
pub use http_provider::HttpProvider;
pub use loader::ReferenceLoader;
