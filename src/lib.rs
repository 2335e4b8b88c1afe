//! # brightkite - Brightkite API client for Rust
//!
//! A Rust client for the Brightkite location-based social network's
//! REST API. This library handles authentication, request building,
//! and response parsing for the people, places, objects, placemarks,
//! messages, and configuration resources.
//!
//! ## Features
//!
//! - One method per REST resource, with raw-JSON and wrapped variants
//! - Multiple authentication methods:
//!   - HTTP Basic authentication
//!   - OAuth 1.0a with HMAC-SHA1 request signing, including the
//!     request-token / authorize / access-token flow
//! - Entity wrappers (Person, Place, Object, Config) with explicit
//!   field lookup and follow-on queries
//! - Robust error handling with detailed error types
//!
//! ## Basic Usage
//!
//! ```no_run
//! use brightkite::{Auth, Brightkite};
//!
//! fn main() -> Result<(), brightkite::BrightkiteError> {
//!     let api = Brightkite::new(Auth::basic("username", "password"));
//!
//!     let me = api.me()?;
//!     println!("Logged in as {}", me.login()?);
//!
//!     for place in api.places("Burlingame, CA")? {
//!         println!("{}", place);
//!     }
//!
//!     for checkin in me.checkins()? {
//!         println!("{}", checkin);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! ### HTTP Basic
//!
//! ```no_run
//! use brightkite::{Auth, Brightkite};
//!
//! let api = Brightkite::new(Auth::basic("username", "password"));
//! ```
//!
//! ### OAuth
//!
//! With a previously obtained access token:
//!
//! ```no_run
//! use brightkite::{Auth, Brightkite, Consumer, Token};
//!
//! let consumer = Consumer::new("consumer_key", "consumer_secret");
//! let token = Token::new("access_key", "access_secret");
//! let api = Brightkite::new(Auth::oauth(consumer, Some(token)));
//! ```
//!
//! Or through the full token flow:
//!
//! ```no_run
//! use brightkite::{Auth, Brightkite, Consumer};
//!
//! # fn main() -> Result<(), brightkite::BrightkiteError> {
//! let consumer = Consumer::new("consumer_key", "consumer_secret");
//! let api = Brightkite::new(Auth::oauth(consumer, None));
//!
//! let request_token = api.oauth_request_token()?;
//! println!("Authorize at: {}", api.oauth_authorize_url(&request_token)?);
//! // ... after the user authorizes the request token ...
//! let access_token = api.oauth_access_token(&request_token)?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod entity;
pub mod error;
pub mod oauth;
pub mod rest;

// Re-export main types for convenience
pub use auth::{Auth, Params};
pub use client::{ClientConfig, SERVER};
pub use entity::{Config, Fields, Object, ObjectFilter, Person, Place};
pub use error::{BrightkiteError, Result};
pub use oauth::{Consumer, Token};
pub use rest::Brightkite;

// Re-export serde_json for convenience
pub use serde_json::json;
