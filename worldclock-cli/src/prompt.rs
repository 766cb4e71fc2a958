use inquire::{InquireError, Password, PasswordDisplayMode};
use tracing::warn;
use worldclock_core::KeyPrompt;

/// Asks for the OpenWeather key on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquireKeyPrompt;

impl KeyPrompt for InquireKeyPrompt {
    fn request_key(&self) -> Option<String> {
        let answer = Password::new("OpenWeather API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .with_help_message("Get one at https://home.openweathermap.org/api_keys")
            .prompt();

        match answer {
            Ok(key) if !key.trim().is_empty() => Some(key),
            Ok(_) => None,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => None,
            Err(err) => {
                warn!(error = %err, "API key prompt failed");
                None
            }
        }
    }
}
