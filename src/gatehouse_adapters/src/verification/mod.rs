pub mod jwt_token_verifier;

pub use jwt_token_verifier::{
    ACCESS_TOKEN_USE, ID_TOKEN_USE, JwksError, JwtTokenVerifier, JwtVerifierConfig, TokenClaims,
    claims_for, issue_token,
};
