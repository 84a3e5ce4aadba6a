//! Submission to the JoFotara API and response normalization.
//!
//! Enabled by the `api` feature (on by default). [`JoFotaraInvoice::send`]
//! lives here; everything else in the crate works without it.
//!
//! [`JoFotaraInvoice::send`]: crate::JoFotaraInvoice::send

mod client;
mod response;

pub use response::{ApiMessage, JoFotaraResponse};
