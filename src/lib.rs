pub mod age;
pub mod config;
pub mod error;
pub mod filter;
pub mod handler;
pub mod provider;
pub mod scanner;
pub mod volume;

#[cfg(test)]
mod test_utils;

pub mod prelude {
    pub use crate::error::{Error, Result};
}
