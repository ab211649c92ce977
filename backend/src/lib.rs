//! Complaint portal backend.
//!
//! Users register and receive a six digit secret code, which they then use
//! to log in, file complaints and list their own complaints. An admin route
//! lists and resolves every complaint.
//!
//! Each user document keeps the ids of its complaints. That list is updated
//! best-effort after a complaint is stored, so a failed update leaves the
//! complaint in place without its back-reference.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod service;
