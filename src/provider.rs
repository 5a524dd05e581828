//! Provider-facing descriptors: validated endpoint metadata consumed by flows.
//!
//! `descriptor` exposes [`ProviderDescriptor`], covering HTTPS-only OAuth 1.0a endpoints
//! (request token, authorization, access token, user details), the consent callback
//! policy, and the authorization-URL building rule.

pub mod descriptor;

pub use descriptor::*;
