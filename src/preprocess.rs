//! Feature preprocessing: raw worker payload to model-ready vector.
//!
//! Fixed sequence of column transforms, driven entirely by the state captured
//! in the model artifact: credit-age parsing, negative-value clipping,
//! imputation from training statistics, standardization, and drop-first
//! one-hot encoding. Deterministic and stateless.

use crate::domain::WorkerFeatures;
use crate::error::{GigstressError, Result};
use crate::model::ModelArtifact;

/// Categorical fallback for missing values, matching the training pipeline.
const MISSING_CATEGORY: &str = "Unknown";

/// Parse a credit-history duration string like `"17 y. 11 m."` into months.
///
/// Anything that does not yield two non-negative integers is treated as
/// missing and left to imputation.
pub fn parse_credit_age(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(" y.", " ").replace(" m.", " ");
    let mut parts = cleaned.split_whitespace();
    let years: i64 = parts.next()?.parse().ok()?;
    let months: i64 = parts.next()?.parse().ok()?;
    if years < 0 || months < 0 {
        return None;
    }
    Some((years * 12 + months) as f64)
}

/// Resolve a numeric training column against the payload.
///
/// `num_savings_accounts` and `avg_loan_delay_days` are clipped at zero here,
/// and the `credit_age_months_numeric` column is derived from the raw
/// duration string. Returns `Ok(None)` when the value is absent.
fn numeric_value(features: &WorkerFeatures, column: &str) -> Result<Option<f64>> {
    let value = match column {
        "worker_age" => features.worker_age,
        "estimated_annual_income" => features.estimated_annual_income,
        "monthly_gig_income" => features.monthly_gig_income,
        "num_savings_accounts" => features.num_savings_accounts.map(|v| v.max(0) as f64),
        "num_credit_cards" => features.num_credit_cards.map(|v| v as f64),
        "avg_credit_interest" => features.avg_credit_interest,
        "num_active_loans" => features.num_active_loans.map(|v| v as f64),
        "avg_loan_delay_days" => features.avg_loan_delay_days.map(|v| v.max(0.0)),
        "missed_payment_events" => features.missed_payment_events.map(|v| v as f64),
        "recent_credit_checks" => features.recent_credit_checks.map(|v| v as f64),
        "current_total_liability" => features.current_total_liability,
        "credit_utilization_rate" => features.credit_utilization_rate,
        "credit_age_months_numeric" => features
            .credit_age_months
            .as_deref()
            .and_then(parse_credit_age),
        "monthly_investments" => features.monthly_investments,
        "end_of_month_balance" => features.end_of_month_balance,
        _ => {
            return Err(GigstressError::InvalidArtifact(format!(
                "unknown numeric column {column:?}"
            )))
        }
    };
    Ok(value)
}

fn categorical_value<'a>(
    features: &'a WorkerFeatures,
    column: &str,
) -> Result<Option<&'a str>> {
    let value = match column {
        "survey_month" => features.survey_month.as_deref(),
        "job_sector" => features.job_sector.as_deref(),
        "min_payment_flag" => features.min_payment_flag.as_deref(),
        "spending_behavior" => features.spending_behavior.as_deref(),
        _ => {
            return Err(GigstressError::InvalidArtifact(format!(
                "unknown categorical column {column:?}"
            )))
        }
    };
    Ok(value)
}

/// Verify that every training column resolves to a payload field.
///
/// Run once at load time so a stale or foreign artifact is refused before it
/// can serve a single request.
pub fn check_schema(artifact: &ModelArtifact) -> Result<()> {
    let empty = WorkerFeatures::default();
    for column in &artifact.numerical_features {
        numeric_value(&empty, column)?;
    }
    for column in &artifact.categorical_features {
        categorical_value(&empty, column)?;
    }
    Ok(())
}

/// Run the full preprocessing pipeline for one worker record.
///
/// Output width always equals `artifact.encoded_width()`; the same payload
/// and artifact produce the same vector bit-for-bit.
pub fn build_feature_vector(
    features: &WorkerFeatures,
    artifact: &ModelArtifact,
) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(artifact.encoded_width());

    for column in &artifact.numerical_features {
        let raw = numeric_value(features, column)?;
        let value = match raw {
            Some(v) => v,
            None => artifact.imputation_value(column).ok_or_else(|| {
                GigstressError::InvalidArtifact(format!(
                    "no imputation statistic for column {column:?}"
                ))
            })?,
        };
        let mean = artifact.scaler.mean.get(column);
        let std = artifact.scaler.std.get(column);
        let (mean, std) = match (mean, std) {
            (Some(m), Some(s)) => (*m, *s),
            _ => {
                return Err(GigstressError::InvalidArtifact(format!(
                    "no scaler parameters for column {column:?}"
                )))
            }
        };
        out.push((value - mean) / std);
    }

    for column in &artifact.categorical_features {
        let value = categorical_value(features, column)?.unwrap_or(MISSING_CATEGORY);
        let cats = artifact.encoder.categories.get(column).ok_or_else(|| {
            GigstressError::InvalidArtifact(format!("no category list for column {column:?}"))
        })?;
        // Drop-first encoding; a category unseen at fit time leaves the whole
        // block at zero.
        for category in &cats[1..] {
            out.push(if value == category { 1.0 } else { 0.0 });
        }
    }

    Ok(out)
}
