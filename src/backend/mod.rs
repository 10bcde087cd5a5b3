//! HTTP client for the external answer backend.
//!
//! The backend is a single `POST /ask` endpoint: `{"message": ...}` in,
//! `{"reply": ...}` out. Requests run on a dedicated worker thread that
//! consumes commands and emits events over channels, so the UI never blocks.

mod client;
mod worker;

pub use client::{AskRequest, AskResponse, BackendConfig};
pub use worker::{AskCommand, AskEvent, AskWorker};
