//! Remote access to a GitLab-style REST API.
//!
//! Every request goes through a [`Transport`](http_client::Transport) so the
//! paging and endpoint logic can run against an in-memory server in tests.

pub mod api;
pub mod error;
pub mod http_client;
pub mod link;
pub mod paged;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use api::{ProjectId, RemoteApi};
pub use error::{RemoteError, Result};
pub use http_client::{HttpResponse, Transport, UreqTransport};
pub use paged::{PagedQuery, Record};
