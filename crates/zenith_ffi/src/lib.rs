//! Flutter bridge for the Zenith core crate.

pub mod api;
