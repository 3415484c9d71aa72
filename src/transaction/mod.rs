//! Transfer management for the application.
//!
//! This module contains everything related to transfers:
//! - The domain models and the draft/validation types
//! - The pure filter and aggregation functions behind the table view
//! - The per-user listing snapshot with refresh sequencing
//! - View handlers for the transfers pages and mutation endpoints

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
pub mod filter;
mod form;
pub mod listing;
pub mod model;
mod new_transfer_page;
mod transactions_page;
mod view;

pub use create_endpoint::create_transfer_endpoint;
pub use delete_endpoint::delete_transfer_endpoint;
pub use edit_endpoint::update_transfer_endpoint;
pub use edit_page::get_edit_transfer_page;
pub use form::TransactionFormData;
pub use listing::ListingStore;
pub use new_transfer_page::get_new_transfer_page;
pub use transactions_page::get_transfers_page;
