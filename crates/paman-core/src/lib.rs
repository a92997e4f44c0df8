//! Core of `paman`: a flat-file credential store whose records are obscured
//! with a fixed-key XOR transform.

pub mod cipher;
pub mod config;
pub mod error;
pub mod lock;
pub mod query;
pub mod record;
pub mod store;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::StoreConfig;
pub use error::{PamanError, PamanResult};
pub use query::{insert, is_unique, list_all, search, Matches};
pub use record::{generate_password, parse_record, serialize_record, Credential, Password, Record};
pub use store::{convert_file, Store};
