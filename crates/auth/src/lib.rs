//! `carbonharvest-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: claims
//! validation, role-to-permission policy, and token codecs are all pure and
//! deterministic so the API layer (and tests) can drive them directly.

pub mod action_token;
pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod roles;

pub use action_token::{ActionClaims, ActionTokenError, ActionTokenService, TokenPurpose};
pub use authorize::{AuthzError, CommandAuthorization, Principal, authorize};
pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256TokenCodec, TokenCodec, TokenCodecError};
pub use permissions::{Permission, role_permissions};
pub use roles::Role;
