//! The HTTP client for the remote transfers REST API.
//!
//! All durable state lives behind this API; this module is the only place
//! that talks to it. Wire DTOs keep the API's Portuguese field names and
//! are translated to the domain types in [crate::transaction] at the
//! boundary.

mod client;
mod tags;
mod transactions;
mod users;

pub use client::ApiClient;
pub use tags::fetch_tags;
pub use transactions::{
    create_transaction, delete_transaction, fetch_transactions, update_transaction,
};
pub use users::{AuthSuccess, log_in, sign_up};
