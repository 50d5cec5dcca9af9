use serde::{Deserialize, Serialize};

/// Input features for a single worker.
///
/// Every field is optional; absent values are imputed from training
/// statistics during preprocessing. `worker_id` is an opaque passthrough
/// identifier and never reaches the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerFeatures {
    #[serde(default)]
    pub worker_id: Option<String>,
    /// Month when the survey data was collected
    #[serde(default)]
    pub survey_month: Option<String>,
    #[serde(default)]
    pub worker_age: Option<f64>,
    /// Type of gig job (e.g. "Writer", "Driver")
    #[serde(default)]
    pub job_sector: Option<String>,
    #[serde(default)]
    pub estimated_annual_income: Option<f64>,
    #[serde(default)]
    pub monthly_gig_income: Option<f64>,
    #[serde(default)]
    pub num_savings_accounts: Option<i64>,
    #[serde(default)]
    pub num_credit_cards: Option<i64>,
    /// Average credit card interest rate in percent
    #[serde(default)]
    pub avg_credit_interest: Option<f64>,
    #[serde(default)]
    pub num_active_loans: Option<i64>,
    #[serde(default)]
    pub avg_loan_delay_days: Option<f64>,
    #[serde(default)]
    pub missed_payment_events: Option<i64>,
    /// Credit inquiries in the past 3 months
    #[serde(default)]
    pub recent_credit_checks: Option<i64>,
    #[serde(default)]
    pub current_total_liability: Option<f64>,
    /// Credit used / credit limit ratio in percent
    #[serde(default)]
    pub credit_utilization_rate: Option<f64>,
    /// Credit history duration string, e.g. "17 y. 11 m."
    #[serde(default)]
    pub credit_age_months: Option<String>,
    /// Minimum-payment behavior flag: Yes / No / NM
    #[serde(default)]
    pub min_payment_flag: Option<String>,
    #[serde(default)]
    pub monthly_investments: Option<f64>,
    #[serde(default)]
    pub spending_behavior: Option<String>,
    #[serde(default)]
    pub end_of_month_balance: Option<f64>,
}

impl WorkerFeatures {
    /// Validate field bounds, collecting every violation.
    ///
    /// `num_savings_accounts` and `avg_loan_delay_days` are deliberately not
    /// bounded below: the training pipeline clips negatives there, so the
    /// service clips too instead of rejecting.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "worker_age", self.worker_age, 14.0, 120.0);
        check_non_negative(
            &mut errors,
            "estimated_annual_income",
            self.estimated_annual_income,
        );
        check_non_negative(&mut errors, "monthly_gig_income", self.monthly_gig_income);
        check_non_negative_int(&mut errors, "num_credit_cards", self.num_credit_cards);
        check_range(
            &mut errors,
            "avg_credit_interest",
            self.avg_credit_interest,
            0.0,
            100.0,
        );
        check_non_negative_int(&mut errors, "num_active_loans", self.num_active_loans);
        check_non_negative_int(
            &mut errors,
            "missed_payment_events",
            self.missed_payment_events,
        );
        check_non_negative_int(
            &mut errors,
            "recent_credit_checks",
            self.recent_credit_checks,
        );
        check_non_negative(
            &mut errors,
            "current_total_liability",
            self.current_total_liability,
        );
        check_range(
            &mut errors,
            "credit_utilization_rate",
            self.credit_utilization_rate,
            0.0,
            100.0,
        );
        check_non_negative(&mut errors, "monthly_investments", self.monthly_investments);
        check_non_negative(
            &mut errors,
            "end_of_month_balance",
            self.end_of_month_balance,
        );

        // Clip columns still have to be real numbers.
        if let Some(v) = self.avg_loan_delay_days {
            if !v.is_finite() {
                errors.push("avg_loan_delay_days must be a finite number".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_range(errors: &mut Vec<String>, field: &str, value: Option<f64>, min: f64, max: f64) {
    if let Some(v) = value {
        if !v.is_finite() {
            errors.push(format!("{field} must be a finite number"));
        } else if v < min || v > max {
            errors.push(format!("{field} must be between {min} and {max}, got {v}"));
        }
    }
}

fn check_non_negative(errors: &mut Vec<String>, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() {
            errors.push(format!("{field} must be a finite number"));
        } else if v < 0.0 {
            errors.push(format!("{field} cannot be negative, got {v}"));
        }
    }
}

fn check_non_negative_int(errors: &mut Vec<String>, field: &str, value: Option<i64>) {
    if let Some(v) = value {
        if v < 0 {
            errors.push(format!("{field} cannot be negative, got {v}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_valid() {
        assert!(WorkerFeatures::default().validate().is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let features = WorkerFeatures {
            worker_age: Some(150.0),
            avg_credit_interest: Some(-2.0),
            num_credit_cards: Some(-1),
            ..Default::default()
        };
        let errors = features.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("worker_age")));
        assert!(errors.iter().any(|e| e.contains("avg_credit_interest")));
        assert!(errors.iter().any(|e| e.contains("num_credit_cards")));
    }

    #[test]
    fn clip_columns_accept_negatives() {
        let features = WorkerFeatures {
            num_savings_accounts: Some(-3),
            avg_loan_delay_days: Some(-7.5),
            ..Default::default()
        };
        assert!(features.validate().is_ok());
    }

    #[test]
    fn deserializes_partial_payload() {
        let features: WorkerFeatures =
            serde_json::from_str(r#"{"worker_id": "abc123", "worker_age": 28.0}"#).unwrap();
        assert_eq!(features.worker_id.as_deref(), Some("abc123"));
        assert_eq!(features.worker_age, Some(28.0));
        assert!(features.job_sector.is_none());
    }
}
