//! HTTP handlers

pub mod bundle;
