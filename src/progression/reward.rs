//! Grade reward table

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::{DyeError, Result};
use crate::scoring::grade::Grade;

/// Experience and currency granted for a graded submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub exp: u64,
    pub currency: u64,
}

impl Reward {
    pub const fn new(exp: u64, currency: u64) -> Self {
        Self { exp, currency }
    }
}

/// Reward per grade
///
/// Must be monotonic: a higher grade never pays less experience or currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTable {
    #[serde(rename = "C")]
    pub c: Reward,
    #[serde(rename = "B")]
    pub b: Reward,
    #[serde(rename = "A")]
    pub a: Reward,
    #[serde(rename = "S")]
    pub s: Reward,
    #[serde(rename = "SS")]
    pub ss: Reward,
    #[serde(rename = "SSS")]
    pub sss: Reward,
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            c: Reward::new(10, 5),
            b: Reward::new(20, 10),
            a: Reward::new(35, 20),
            s: Reward::new(50, 35),
            ss: Reward::new(75, 50),
            sss: Reward::new(100, 80),
        }
    }
}

impl RewardTable {
    pub fn reward_for(&self, grade: Grade) -> Reward {
        match grade {
            Grade::C => self.c,
            Grade::B => self.b,
            Grade::A => self.a,
            Grade::S => self.s,
            Grade::SS => self.ss,
            Grade::SSS => self.sss,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for pair in Grade::ALL.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            let (lo, hi) = (self.reward_for(lower), self.reward_for(higher));
            if hi.exp < lo.exp || hi.currency < lo.currency {
                return Err(DyeError::InvalidConfig(format!(
                    "reward for grade {} ({:?}) is lower than for grade {} ({:?})",
                    higher, hi, lower, lo
                )));
            }
        }
        Ok(())
    }
}

/// Reward for a grade from the global table
pub fn reward_for_grade(grade: Grade) -> Reward {
    config().rewards.reward_for(grade)
}

/// Reward for a grade label such as `"SS"`
///
/// Unknown labels fail with `InvalidGrade` instead of defaulting to a reward.
pub fn reward_for_label(label: &str) -> Result<Reward> {
    let grade: Grade = label.parse()?;
    Ok(reward_for_grade(grade))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_monotonic() {
        let table = RewardTable::default();
        assert!(table.validate().is_ok());
        for pair in Grade::ALL.windows(2) {
            let lo = table.reward_for(pair[0]);
            let hi = table.reward_for(pair[1]);
            assert!(hi.exp >= lo.exp);
            assert!(hi.currency >= lo.currency);
        }
    }

    #[test]
    fn test_every_grade_pays_something() {
        for grade in Grade::ALL {
            let reward = reward_for_grade(grade);
            assert!(reward.exp > 0, "{}", grade);
            assert!(reward.currency > 0, "{}", grade);
        }
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(reward_for_label("A").unwrap(), Reward::new(35, 20));
        assert_eq!(reward_for_label("sss").unwrap(), Reward::new(100, 80));
    }

    #[test]
    fn test_invalid_label_is_error_not_default() {
        assert!(matches!(
            reward_for_label("invalid"),
            Err(DyeError::InvalidGrade(label)) if label == "invalid"
        ));
    }

    #[test]
    fn test_non_monotonic_table_rejected() {
        let table = RewardTable {
            s: Reward::new(30, 40),
            ..RewardTable::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_table_overrides_from_toml() {
        let table: RewardTable = toml::from_str(
            r#"
            [SSS]
            exp = 250
            currency = 200
            "#,
        )
        .unwrap();
        assert_eq!(table.sss, Reward::new(250, 200));
        assert_eq!(table.c, Reward::new(10, 5));
    }
}
