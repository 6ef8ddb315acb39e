use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One annual income statement report.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    /// End of the fiscal year this report covers
    pub fiscal_date_ending: NaiveDate,

    /// Reporting currency (e.g., "USD")
    pub reported_currency: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<Decimal>,
}

/// Income statement history for one symbol, most recent report first
/// (the vendor's ordering).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub symbol: String,
    pub annual_reports: Vec<FinancialReport>,
}
