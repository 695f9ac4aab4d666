pub mod address;
pub mod import;
pub mod lang;
pub mod session;

pub use crate::domain::model::{ImportReport, Notice, SendForm, SettingsForm};
pub use crate::domain::ports::{Backend, Storage};
pub use crate::utils::error::Result;
