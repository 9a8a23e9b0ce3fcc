pub mod activate_mfa;
pub mod add_group;
pub mod add_mfa;
pub mod admin_remove_mfa;
pub mod confirm_sign_up;
pub mod create_admin;
pub mod get_me;
pub mod login;
pub mod logout;
pub mod reconcile_pending_groups;
pub mod refresh_token;
pub mod remove_group;
pub mod remove_mfa;
pub mod send_confirmation_code;
pub mod set_password;
pub mod sign_up;
pub mod verify_login_mfa;
pub mod verify_mfa;
