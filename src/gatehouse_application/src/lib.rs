pub mod auth_service;
pub mod error_translator;
pub mod token_validator;
pub mod use_cases;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use auth_service::{AuthService, AuthServiceConfig, DEFAULT_PROVIDER_TIMEOUT};
pub use error_translator::{Operation, translate};
pub use token_validator::TokenValidator;
pub use workflow::{ProvisioningStep, ProvisioningWorkflow};

pub use use_cases::{
    activate_mfa::ActivateMfaUseCase, add_group::AddGroupUseCase, add_mfa::AddMfaUseCase,
    admin_remove_mfa::AdminRemoveMfaUseCase, confirm_sign_up::ConfirmSignUpUseCase,
    create_admin::CreateAdminUseCase, get_me::GetMeUseCase, login::LoginUseCase,
    logout::LogoutUseCase, reconcile_pending_groups::ReconcilePendingGroupsUseCase,
    refresh_token::RefreshTokenUseCase, remove_group::RemoveGroupUseCase,
    remove_mfa::RemoveMfaUseCase, send_confirmation_code::SendConfirmationCodeUseCase,
    set_password::SetPasswordUseCase, sign_up::SignUpUseCase,
    verify_login_mfa::VerifyLoginMfaUseCase, verify_mfa::VerifyMfaUseCase,
};
