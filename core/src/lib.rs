//! Core components for signing API requests.
//!
//! This crate provides the provider-neutral building blocks shared by the
//! apisign service signers.
//!
//! ## Overview
//!
//! - **SigningRequest**: A plain description of the HTTP request to be signed
//! - **QueryValue**: The value types accepted as query arguments
//! - **Error**: The typed error returned by every signing operation
//! - **Env**: Abstract access to environment variables, used by configuration loaders
//!
//! ## Example
//!
//! ```
//! use apisign_core::{QueryValue, SigningRequest};
//!
//! let req = SigningRequest::new("GET", "examplebucket.s3.amazonaws.com", "/photos/cat.jpg")
//!     .with_query("versionId", "3")
//!     .with_query("acl", true);
//!
//! assert_eq!(req.query.get("acl"), Some(&QueryValue::Bool(true)));
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

mod request;
pub use request::{QueryArgs, QueryValue, SigningRequest};
