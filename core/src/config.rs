use crate::error::{ReviewError, ReviewResult};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "review_config.json";

/// Process-wide review settings. Read-only for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewConfig {
    /// NEEDED fires this many days before the due date.
    pub alert_window_days: i64,
    /// Header above the list of items entering their alert window.
    pub needed_message: String,
    /// Header above the list of items past their due date.
    pub overdue_message: String,
    /// Subject line of every reminder message.
    pub subject: String,
    /// Login page; reminder links pass through it with a `destination`.
    pub login_url: String,
}

impl ReviewConfig {
    /// Load from `{data_dir}/review_config.json` and validate.
    /// In tests, use ReviewConfig::default_test().
    pub fn load(data_dir: &str) -> ReviewResult<Self> {
        let path = format!("{data_dir}/{CONFIG_FILE}");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ReviewConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded review config from {path}");
        Ok(config)
    }

    pub fn validate(&self) -> ReviewResult<()> {
        if self.alert_window_days < 0 {
            return Err(ReviewError::config(
                "alert_window_days",
                format!("must be non-negative, got {}", self.alert_window_days),
            ));
        }
        let required = [
            ("needed_message", &self.needed_message),
            ("overdue_message", &self.overdue_message),
            ("subject", &self.subject),
            ("login_url", &self.login_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ReviewError::config(field, "must not be blank"));
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            alert_window_days: 30,
            needed_message: "The following data sets are due for review.".into(),
            overdue_message: "The following data sets are overdue for review.".into(),
            subject: "Data sets requiring review".into(),
            login_url: "https://catalogue.test/user/login".into(),
        }
    }
}
