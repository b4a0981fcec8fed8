use color_eyre::Result;
use dialoguer::{Input, Password};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new().with_prompt(prompt);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a password (masked input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}

/// Prompt for a password twice, for account creation
pub fn prompt_new_password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}
