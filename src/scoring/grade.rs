//! Letter grades assigned from the total score

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{DyeError, Result};

/// Quality tier of a scored cloth, lowest first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Grade {
    #[default]
    C,
    B,
    A,
    S,
    SS,
    SSS,
}

impl Grade {
    /// Every grade in ascending order
    pub const ALL: [Grade; 6] = [Grade::C, Grade::B, Grade::A, Grade::S, Grade::SS, Grade::SSS];

    pub fn label(&self) -> &'static str {
        match self {
            Grade::C => "C",
            Grade::B => "B",
            Grade::A => "A",
            Grade::S => "S",
            Grade::SS => "SS",
            Grade::SSS => "SSS",
        }
    }

    /// Next grade up, None for the top grade
    pub fn next(&self) -> Option<Grade> {
        match self {
            Grade::C => Some(Grade::B),
            Grade::B => Some(Grade::A),
            Grade::A => Some(Grade::S),
            Grade::S => Some(Grade::SS),
            Grade::SS => Some(Grade::SSS),
            Grade::SSS => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = DyeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Grade::C),
            "B" => Ok(Grade::B),
            "A" => Ok(Grade::A),
            "S" => Ok(Grade::S),
            "SS" => Ok(Grade::SS),
            "SSS" => Ok(Grade::SSS),
            _ => Err(DyeError::InvalidGrade(s.to_string())),
        }
    }
}

/// Inclusive lower bound of every grade above C
///
/// C always starts at 0 and SSS always ends at 100, so strictly ascending bounds
/// cover [0, 100] without gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeThresholds {
    pub b: u8,
    pub a: u8,
    pub s: u8,
    pub ss: u8,
    pub sss: u8,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            b: 40,
            a: 55,
            s: 70,
            ss: 82,
            sss: 92,
        }
    }
}

impl GradeThresholds {
    pub fn lower_bound(&self, grade: Grade) -> u8 {
        match grade {
            Grade::C => 0,
            Grade::B => self.b,
            Grade::A => self.a,
            Grade::S => self.s,
            Grade::SS => self.ss,
            Grade::SSS => self.sss,
        }
    }

    /// Range of totals that earn `grade`
    ///
    /// Unvalidated thresholds may yield overlapping bands but never panic.
    pub fn band(&self, grade: Grade) -> RangeInclusive<u8> {
        let upper = match grade.next() {
            Some(next) => self.lower_bound(next).saturating_sub(1),
            None => 100,
        };
        self.lower_bound(grade)..=upper
    }

    /// Grade for a total score; totals above 100 grade as 100
    pub fn grade_for(&self, total: u8) -> Grade {
        Grade::ALL
            .iter()
            .rev()
            .copied()
            .find(|grade| total >= self.lower_bound(*grade))
            .unwrap_or(Grade::C)
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [self.b, self.a, self.s, self.ss, self.sss];
        if bounds[0] == 0 {
            return Err(DyeError::InvalidConfig(
                "grade B threshold must be above 0 so grade C is reachable".into(),
            ));
        }
        if bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(DyeError::InvalidConfig(format!(
                "grade thresholds must be strictly ascending, got {:?}",
                bounds
            )));
        }
        if self.sss > 100 {
            return Err(DyeError::InvalidConfig(format!(
                "grade SSS threshold {} exceeds 100",
                self.sss
            )));
        }
        Ok(())
    }
}
