//! HTTP requests carried out by the curl command line tool.
//!
//! Instead of speaking HTTP itself, this crate turns a request into a curl
//! invocation, runs it, and turns curl's output back into a response. That
//! way curl's TLS, authentication and proxy handling can be reused behind a
//! typed request/response interface.
//!
//! - `encode` turns a request into a curl argument list.
//! - `decode` turns the output of `curl -s -i` into a response.
//! - `CurlRequest` ties the two together around a process runner.
//!
//! ```txt
//!            encode               run
//! request  --------> argv  --------------> curl
//!                                            |
//! response <-------- output <----------------'
//!            decode
//! ```
//!
//! # Example
//!
//! ```no_run
//! use http_types::{Method, Request, Url};
//!
//! # fn main() -> curl_h1::Result<()> {
//! # futures_lite::future::block_on(async {
//! let url = Url::parse("https://example.com/").unwrap();
//! let mut req = curl_h1::CurlRequest::new(Request::new(Method::Get, url))?;
//! req.add_header("Accept", "application/json")?;
//! req.generate_command(false).await?;
//! let res = req.send().await?;
//! println!("{:?} {}", res.status(), res.status_text());
//! # Ok::<(), curl_h1::Error>(())
//! # })
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(future_incompatible, rust_2018_idioms)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

pub use decode::{parse, Response};
pub use encode::{encode, CommandPlan};
pub use error::{Error, ErrorKind};
pub use process::{execute, execute_with_cancel, ProcessRunner, SystemRunner};
pub use request::{CurlRequest, Options};
pub use tls::{Certificate, FileType, PrivateKey, TlsOptions};

mod error;
mod future;

pub mod cancel;
pub mod decode;
pub mod encode;
pub mod process;
pub mod request;
pub mod tls;

/// A specialized `Result` for this crate.
pub type Result<T> = std::result::Result<T, Error>;
