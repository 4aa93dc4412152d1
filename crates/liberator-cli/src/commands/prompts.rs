use color_eyre::Result;
use dialoguer::{Input, Password};
use std::io::{self, BufRead, IsTerminal};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder.interact_text().map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a secret, asking twice when nothing is stored yet
pub fn prompt_secret(prompt: &str, confirm: bool) -> Result<String> {
    let mut password_prompt = Password::new().with_prompt(prompt);
    if confirm {
        password_prompt = password_prompt.with_confirmation(format!("Confirm {}", prompt), "Values do not match");
    }

    password_prompt
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read {}: {}", prompt, e))
}

/// Block until the user presses Enter.
///
/// Without a terminal a single line (or end of input) from stdin counts.
pub fn wait_for_enter(message: &str) -> io::Result<()> {
    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        Input::<String>::new()
            .with_prompt(message)
            .allow_empty(true)
            .report(false)
            .interact_text()
            .map(|_| ())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    } else {
        eprintln!("{}", message);
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|_| ())
    }
}
