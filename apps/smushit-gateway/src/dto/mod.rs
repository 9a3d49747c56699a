//! Request and response bodies

pub mod bundle;
