pub mod claims;
pub mod customer;
pub mod outcome;
pub mod policy;
pub mod request;
pub mod secret;

pub use claims::{CustomerIdentity, SessionClaims, TOKEN_LIFETIME_LABEL, TOKEN_LIFETIME_SECS};
pub use customer::Customer;
pub use outcome::{InvalidReason, ValidationOutcome};
pub use policy::{AuthorizerPolicy, Effect, PolicyContext};
pub use request::{AuthorizerEvent, DirectRequest, InboundRequest, RequestBody};
pub use secret::SigningSecret;
