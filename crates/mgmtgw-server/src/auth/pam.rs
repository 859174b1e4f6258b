//! Password validation through the host PAM stack.

use std::ffi::{CStr, CString};

use pam_client::{Context, ConversationHandler, ErrorCode, Flag};

use super::credential::{PasswordVerifier, DEFAULT_PAM_SERVICE};
use super::error::AuthError;

/// Answers every prompt with the password and ignores informational
/// messages.
struct PasswordConversation {
    password: String,
}

impl PasswordConversation {
    fn answer(&self) -> Result<CString, ErrorCode> {
        CString::new(self.password.as_bytes()).map_err(|_| ErrorCode::CONV_ERR)
    }
}

impl ConversationHandler for PasswordConversation {
    fn prompt_echo_on(&mut self, _msg: &CStr) -> Result<CString, ErrorCode> {
        self.answer()
    }

    fn prompt_echo_off(&mut self, _msg: &CStr) -> Result<CString, ErrorCode> {
        self.answer()
    }

    fn text_info(&mut self, _msg: &CStr) {}

    fn error_msg(&mut self, _msg: &CStr) {}
}

/// Verifies passwords with PAM.
#[derive(Debug, Clone)]
pub struct PamLogin {
    service: String,
}

impl PamLogin {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl Default for PamLogin {
    fn default() -> Self {
        Self::new(DEFAULT_PAM_SERVICE)
    }
}

impl PasswordVerifier for PamLogin {
    fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let conversation = PasswordConversation {
            password: password.to_string(),
        };

        let result = Context::new(&self.service, Some(username), conversation)
            .and_then(|mut context| context.authenticate(Flag::NONE));

        result.map_err(|e| {
            tracing::info!(user = %username, service = %self.service, error = %e, "PAM login failed");
            AuthError::credentials(username, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(password: &str) -> PasswordConversation {
        PasswordConversation {
            password: password.to_string(),
        }
    }

    #[test]
    fn test_prompts_answered_with_password() {
        let prompt = CString::new("Password: ").unwrap();
        let mut conv = conversation("hunter2");

        assert_eq!(conv.prompt_echo_off(&prompt).unwrap().to_str().unwrap(), "hunter2");
        assert_eq!(conv.prompt_echo_on(&prompt).unwrap().to_str().unwrap(), "hunter2");

        let note = CString::new("Last login: yesterday").unwrap();
        conv.text_info(&note);
        conv.error_msg(&note);
        assert_eq!(conv.prompt_echo_off(&prompt).unwrap().to_str().unwrap(), "hunter2");
    }

    #[test]
    fn test_nul_in_password_is_conversation_error() {
        let prompt = CString::new("Password: ").unwrap();
        let mut conv = conversation("bad\0pass");
        assert!(matches!(conv.prompt_echo_off(&prompt), Err(ErrorCode::CONV_ERR)));
        assert!(matches!(conv.prompt_echo_on(&prompt), Err(ErrorCode::CONV_ERR)));
    }
}
