//! Global system settings.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Base monthly salary used until an administrator sets one.
pub const DEFAULT_BASE_SALARY: Decimal = Decimal::from_parts(137_500, 0, 0, false, 0);

/// The single global settings record.
///
/// The base salary applies to every employee regardless of crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Base monthly salary.
    pub base_salary: Decimal,
    /// When the salary was last changed, if ever.
    pub updated_at: Option<NaiveDateTime>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            base_salary: DEFAULT_BASE_SALARY,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_salary() {
        assert_eq!(SystemSettings::default().base_salary, Decimal::new(137500, 0));
    }
}
