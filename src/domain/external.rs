//! Response shapes for the bank, exchange-rate and advisor integrations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::transaction::Transaction;

pub const BANK_SOURCE: &str = "mock-bank-api";
pub const ADVISOR_SOURCE: &str = "gemini-api";

/// Conversion rates keyed by ISO currency code, relative to USD.
pub type RateTable = HashMap<String, f64>;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BankTransactionsResponse {
    pub source: String,
    #[schema(value_type = Vec<Object>)]
    pub transactions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExchangeRateQuery {
    /// ISO currency code such as `EUR`
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ExchangeRateResponse {
    pub currency: String,
    pub rate: f64,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TipsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub tips: Vec<String>,
}

impl TipsResponse {
    #[must_use]
    pub fn no_transactions() -> Self {
        Self {
            source: None,
            message: Some("No transactions found".to_string()),
            tips: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_advisor(tips: Vec<String>) -> Self {
        Self {
            source: Some(ADVISOR_SOURCE.to_string()),
            message: None,
            tips,
        }
    }
}

/// Display symbol for a currency code, `$` when unknown.
#[must_use]
pub fn currency_symbol(code: &str) -> &'static str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "INR" => "₹",
        "JPY" => "¥",
        "AUD" => "A$",
        "CAD" => "C$",
        "RON" => "RON",
        _ => "$",
    }
}

/// Splits advisor output into trimmed, non-empty lines.
#[must_use]
pub fn parse_tips(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the advisor prompt from a user's transaction history.
pub fn tips_prompt(transactions: &[Transaction]) -> Result<String, serde_json::Error> {
    let history = serde_json::to_string_pretty(transactions)?;
    Ok(format!(
        "Based on the following user financial transactions, provide 4 helpful financial tips. \
         Make them short and funny, even ridiculous. Remove any unnecessary symbols, such as *#@#. \
         The response should be in the format: Here are 4 tips for you: 1... 2...:\n\n{}",
        history
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_symbol_table() {
        assert_eq!(currency_symbol("EUR"), "€");
        assert_eq!(currency_symbol("RON"), "RON");
        assert_eq!(currency_symbol("CHF"), "$");
    }

    #[test]
    fn test_parse_tips_drops_blank_lines() {
        let text = "Here are 4 tips for you:\n\n 1. Stop buying lattes \n2. Cook at home\n   \n";
        assert_eq!(
            parse_tips(text),
            vec![
                "Here are 4 tips for you:",
                "1. Stop buying lattes",
                "2. Cook at home"
            ]
        );
        assert!(parse_tips("").is_empty());
    }

    #[test]
    fn test_tips_prompt_embeds_history() {
        let prompt = tips_prompt(&[]).unwrap();
        assert!(prompt.starts_with("Based on the following user financial transactions"));
        assert!(prompt.ends_with("[]"));
    }

    #[test]
    fn test_tips_response_shapes() {
        let empty = serde_json::to_value(TipsResponse::no_transactions()).unwrap();
        assert_eq!(empty["message"], "No transactions found");
        assert!(empty.get("source").is_none());
        assert_eq!(empty["tips"], serde_json::json!([]));

        let tips = serde_json::to_value(TipsResponse::from_advisor(vec!["Save".into()])).unwrap();
        assert_eq!(tips["source"], "gemini-api");
        assert!(tips.get("message").is_none());
    }
}
