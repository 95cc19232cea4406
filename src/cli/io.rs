//! Interactive prompts. Plain output goes through [`crate::cli::output`].

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use rust_decimal::Decimal;

use crate::cli::core::CommandError;
use crate::currency::CurrencyFormat;

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Asks for an amount until the input parses under `format`.
///
/// Only the text is checked here; sign and limits are the ledger's business.
pub fn prompt_amount(
    theme: &ColorfulTheme,
    prompt: &str,
    format: &CurrencyFormat,
) -> Result<Decimal, CommandError> {
    let raw = Input::<String>::with_theme(theme)
        .with_prompt(format!("{} ({})", prompt, format.symbol))
        .validate_with(|input: &String| {
            format
                .parse_amount(input)
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
        .interact_text()?;
    Ok(format.parse_amount(&raw)?)
}
