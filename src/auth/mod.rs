//! Credential handling shared by student and teacher accounts.

pub mod dto;
pub(crate) mod extractors;
pub mod identity;
pub mod keys;
pub mod password;
pub mod services;
