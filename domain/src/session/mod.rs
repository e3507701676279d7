//! Session domain.
//!
//! - [`entities::Session`] — one name-search session and its round state
//! - [`entities::SessionStatus`] — where the session sits in its cycle

pub mod entities;
