pub mod issue_token;
pub mod validate_token;

pub use issue_token::{IssueTokenError, IssueTokenUseCase, IssuedToken};
pub use validate_token::ValidateTokenUseCase;
