//! Auth-domain credential models shared by the protocol facade, flows, and stores.

pub mod credential;
pub mod secret;

pub use credential::*;
pub use secret::*;
