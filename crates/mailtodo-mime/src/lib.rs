//! # mailtodo-mime
//!
//! Lenient MIME message parsing for stored email.
//!
//! ## Features
//!
//! - **Message parsing**: RFC 5322 headers with folded continuation lines
//! - **Multipart**: nested `multipart/*` bodies parsed into a part tree
//! - **Transfer decoding**: Base64 and Quoted-Printable part bodies
//! - **Content types**: `type/subtype` plus parameters
//! - **Dates**: RFC 2822 `Date` header parsing
//!
//! ## Quick Start
//!
//! ```
//! use mailtodo_mime::Message;
//!
//! let raw = "From: sender@example.com\r\n\
//!            Subject: Test\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            Hello, World!";
//!
//! let message = Message::parse(raw.as_bytes()).unwrap();
//! assert_eq!(message.subject(), Some("Test"));
//!
//! for part in message.parts() {
//!     assert_eq!(part.media_type().as_deref(), Some("text/plain"));
//!     assert_eq!(part.body_text(), "Hello, World!");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, Parts, TransferEncoding};
