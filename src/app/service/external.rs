//! Bank feed, exchange rates and spending tips.

use tracing::{error, info, instrument};

use crate::domain::external::{BANK_SOURCE, currency_symbol, parse_tips, tips_prompt};
use crate::domain::{
    AppError, BankTransactionsResponse, ExchangeRateQuery, ExchangeRateResponse, TipsResponse,
    TransactionFilter,
};

use super::{AppService, invalid};

/// Counts one outbound call and logs the failure detail.
fn record<T>(service: &'static str, result: &Result<T, AppError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => {
            error!(service, error = %e, "External service call failed");
            "failure"
        }
    };
    metrics::counter!("external_requests_total", "service" => service, "outcome" => outcome)
        .increment(1);
}

impl AppService {
    /// Mock bank transactions for the caller.
    #[instrument(skip(self))]
    pub async fn bank_transactions(
        &self,
        user_id: &str,
    ) -> Result<BankTransactionsResponse, AppError> {
        let result = self.external.bank.fetch_transactions(user_id).await;
        record("bank", &result);
        Ok(BankTransactionsResponse {
            source: BANK_SOURCE.to_string(),
            transactions: result?,
        })
    }

    /// USD-based rate and display symbol for one currency.
    #[instrument(skip(self))]
    pub async fn exchange_rate(
        &self,
        query: &ExchangeRateQuery,
    ) -> Result<ExchangeRateResponse, AppError> {
        let currency = query
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .ok_or_else(|| invalid("currency", "Missing currency query param"))?
            .to_ascii_uppercase();

        let result = self.external.rates.latest_rates().await;
        record("exchange_rate", &result);
        let rates = result?;

        let rate = rates
            .get(&currency)
            .copied()
            .ok_or_else(|| AppError::not_found("Currency not found in rates"))?;
        Ok(ExchangeRateResponse {
            symbol: currency_symbol(&currency).to_string(),
            currency,
            rate,
        })
    }

    /// Asks the advisor for tips based on the caller's full history.
    #[instrument(skip(self))]
    pub async fn analyze_transactions(&self, user_id: &str) -> Result<TipsResponse, AppError> {
        let transactions = self
            .db
            .list_transactions(user_id, &TransactionFilter::default())
            .await?;
        if transactions.is_empty() {
            return Ok(TipsResponse::no_transactions());
        }

        let prompt = tips_prompt(&transactions)?;
        let result = self.external.advisor.generate(&prompt).await;
        record("advisor", &result);
        let tips = parse_tips(&result?);
        info!(count = tips.len(), "Generated spending tips");
        Ok(TipsResponse::from_advisor(tips))
    }
}
