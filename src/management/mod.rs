//! Credential record ownership and the refresh gate.
//!
//! The [`TokenStore`] is the only component that reads or writes the
//! persisted credential cache; everything else asks it for a valid access
//! token right before use.

mod token;

pub use token::TokenStore;
