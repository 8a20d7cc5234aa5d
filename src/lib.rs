//! Payroll Run Engine
//!
//! This crate turns attendance, overtime and reimbursement records into
//! monthly payslips. A payroll run walks the employee directory in pages,
//! generates exactly one payslip per employee for a period, then marks the
//! period processed, which locks every date inside it against further
//! activity writes.
//!
//! Stores and the cache are injected as trait objects (see [`store`] and
//! [`cache`]); [`engine::PayrollEngine`] wires them into the services.

#![warn(missing_docs)]

pub mod activity;
pub mod cache;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod payroll;
pub mod store;
