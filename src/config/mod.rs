use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::{
    currency::CurrencyFormat,
    errors::BankError,
    ledger::{account::DEFAULT_AGENCY, AccountPolicy, ValidationOrder},
    utils,
};

const TMP_SUFFIX: &str = "tmp";

pub const SETTABLE_KEYS: &[&str] = &[
    "agency",
    "withdrawal_limit_per_operation",
    "max_withdrawals_per_day",
    "max_transactions_per_day",
    "timezone",
    "validation_order",
    "currency_symbol",
    "decimal_separator",
    "grouping_separator",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub agency: String,
    pub policy: AccountPolicy,
    pub currency: CurrencyFormat,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            agency: DEFAULT_AGENCY.into(),
            policy: AccountPolicy::default(),
            currency: CurrencyFormat::default(),
        }
    }
}

impl BankConfig {
    pub fn validate(&self) -> Result<(), BankError> {
        if self.policy.withdrawal_limit_per_operation <= Decimal::ZERO {
            return Err(invalid("withdrawal_limit_per_operation must be positive"));
        }
        if self.policy.max_withdrawals_per_day == 0 {
            return Err(invalid("max_withdrawals_per_day must be at least 1"));
        }
        if self.policy.max_transactions_per_day == 0 {
            return Err(invalid("max_transactions_per_day must be at least 1"));
        }
        if self.policy.max_withdrawals_per_day > self.policy.max_transactions_per_day {
            return Err(invalid(
                "max_withdrawals_per_day cannot exceed max_transactions_per_day",
            ));
        }
        if self.agency.trim().is_empty() {
            return Err(invalid("agency cannot be empty"));
        }
        if self.currency.grouping_separator == Some(self.currency.decimal_separator) {
            return Err(invalid(
                "grouping_separator must differ from decimal_separator",
            ));
        }
        Ok(())
    }

    /// Updates one setting from its textual form, validating the result.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), BankError> {
        let mut updated = self.clone();
        match key {
            "agency" => updated.agency = value.to_string(),
            "withdrawal_limit_per_operation" => {
                updated.policy.withdrawal_limit_per_operation = Decimal::from_str(value)
                    .map_err(|_| invalid(format!("`{}` is not a decimal amount", value)))?;
            }
            "max_withdrawals_per_day" => {
                updated.policy.max_withdrawals_per_day = parse_count(key, value)?;
            }
            "max_transactions_per_day" => {
                updated.policy.max_transactions_per_day = parse_count(key, value)?;
            }
            "timezone" => {
                updated.policy.timezone = value
                    .parse::<Tz>()
                    .map_err(|_| invalid(format!("unknown time zone `{}`", value)))?;
            }
            "validation_order" => {
                updated.policy.validation_order = match value {
                    "balance_first" => ValidationOrder::BalanceFirst,
                    "amount_first" => ValidationOrder::AmountFirst,
                    other => {
                        return Err(invalid(format!(
                            "unknown validation order `{}` (balance_first|amount_first)",
                            other
                        )))
                    }
                };
            }
            "currency_symbol" => updated.currency.symbol = value.to_string(),
            "decimal_separator" => {
                updated.currency.decimal_separator = parse_char(key, value)?;
            }
            "grouping_separator" => {
                updated.currency.grouping_separator = match value {
                    "" | "none" => None,
                    other => Some(parse_char(key, other)?),
                };
            }
            other => {
                return Err(invalid(format!(
                    "unknown key `{}` (expected one of: {})",
                    other,
                    SETTABLE_KEYS.join(", ")
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> BankError {
    BankError::InvalidConfig(message.into())
}

fn parse_count(key: &str, value: &str) -> Result<u32, BankError> {
    value
        .parse::<u32>()
        .map_err(|_| invalid(format!("{} must be a whole number", key)))
}

fn parse_char(key: &str, value: &str) -> Result<char, BankError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(invalid(format!("{} must be a single character", key))),
    }
}

/// Loads and stores [`BankConfig`] as JSON under the application directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BankError> {
        Self::with_base_dir(utils::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BankError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: utils::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<BankConfig, BankError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(BankConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: BankConfig = serde_json::from_str(&data)?;
        config.validate()?;
        tracing::debug!(path = %self.path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn save(&self, config: &BankConfig) -> Result<(), BankError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), BankError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
