//! `pff2eml` — convert `pffexport` output trees into `.eml` files.
//!
//! The export utility writes each message of a PST/OST file as a folder
//! holding its raw headers, an optional HTML or text body and optional
//! attachments. This crate assembles each such folder into one
//! `multipart/mixed` message and mirrors the folder hierarchy on disk.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
