mod admin;
mod helpers;
mod login;
mod mfa;
mod registration;
