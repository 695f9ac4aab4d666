// Adapters layer: concrete implementations for external systems (backend http, local files).

pub mod http;
pub mod storage;

pub use http::HttpBackend;
pub use storage::LocalStorage;
