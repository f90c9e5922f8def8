//! Browsing client for the Wanderlust listing API.
//!
//! [`ListingsClient`] talks to the server's query endpoint; a
//! [`DiscoverySession`] drives infinite scroll, client-side filtering, and
//! favorites for one open listing view.

pub mod client;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod notify;
pub mod pagination;
pub mod session;
pub mod sink;
pub mod source;

pub use client::ListingsClient;
pub use debounce::{Debouncer, DEFAULT_QUIET_WINDOW};
pub use error::ClientError;
pub use favorites::Favorites;
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use pagination::{FetchStatus, PageCursor, Paginator};
pub use session::{
    DiscoverySession, NearEndOutcome, SessionConfig, SessionSnapshot, LOAD_MORE_FAILED,
};
pub use sink::{RenderSink, RenderedListing, Visibility};
pub use source::{FetchedPage, ListingSource};
