pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpBackend, LocalStorage};
pub use config::TomlConfig;
pub use core::address::{extract_addresses, is_valid_address, validate_address_list};
pub use core::session::MailDesk;
pub use utils::error::{ClientError, Result};
