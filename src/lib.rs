mod client;
mod config;
mod error;
mod executor;
mod object;
mod script;

pub use client::ClientManager;
pub use config::Config;
pub use error::{JsObjectError, Result};
pub use executor::ScriptExecutor;
pub use object::{EnumerationScope, JsObject, PropertyValue};
