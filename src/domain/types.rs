// ==========================================
// 学籍成绩管理系统 - 领域类型定义
// ==========================================
// 等级制成绩: F, D-..D+, C-..C+, B-..B+, A-, A, A+
// 序列化格式: 与显示一致（"A+"、"B-" 等）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::grade::{GradeRuleError, MAX_GRADE, MIN_GRADE};

// ==========================================
// 等级成绩 (Letter Grade)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D-")]
    DMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl LetterGrade {
    /// 百分制 → 等级制
    ///
    /// 规则:
    /// - 超出 [0, 100] → OutOfRange
    /// - < 59 → F；== 100 → A+
    /// - 其余按十位取字母 {6:D, 7:C, 8:B, 9:A}，个位 <3 为 "-"，<7 无后缀，否则 "+"
    ///
    /// 注意: 59 的十位为 5，字母表中无对应项，返回 Unmapped（不归入 F）
    pub fn from_value(value: i32) -> Result<Self, GradeRuleError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&value) {
            return Err(GradeRuleError::OutOfRange(value));
        }
        if value < 59 {
            return Ok(LetterGrade::F);
        }
        if value == 100 {
            return Ok(LetterGrade::APlus);
        }

        let tens = value / 10;
        let units = value % 10;
        let band = match tens {
            6 => [LetterGrade::DMinus, LetterGrade::D, LetterGrade::DPlus],
            7 => [LetterGrade::CMinus, LetterGrade::C, LetterGrade::CPlus],
            8 => [LetterGrade::BMinus, LetterGrade::B, LetterGrade::BPlus],
            9 => [LetterGrade::AMinus, LetterGrade::A, LetterGrade::APlus],
            _ => return Err(GradeRuleError::Unmapped(value)),
        };

        Ok(if units < 3 {
            band[0]
        } else if units < 7 {
            band[1]
        } else {
            band[2]
        })
    }

    /// 显示文本
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::F => "F",
            LetterGrade::DMinus => "D-",
            LetterGrade::D => "D",
            LetterGrade::DPlus => "D+",
            LetterGrade::CMinus => "C-",
            LetterGrade::C => "C",
            LetterGrade::CPlus => "C+",
            LetterGrade::BMinus => "B-",
            LetterGrade::B => "B",
            LetterGrade::BPlus => "B+",
            LetterGrade::AMinus => "A-",
            LetterGrade::A => "A",
            LetterGrade::APlus => "A+",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 平均成绩 (Average Grade)
// ==========================================
// 按调用方要求返回百分制或等级制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AverageGrade {
    Numeric(i32),
    Letter(LetterGrade),
}

impl fmt::Display for AverageGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AverageGrade::Numeric(v) => write!(f, "{}", v),
            AverageGrade::Letter(l) => write!(f, "{}", l),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(v: i32) -> String {
        LetterGrade::from_value(v).unwrap().to_string()
    }

    #[test]
    fn test_letter_boundaries() {
        assert_eq!(letter(0), "F");
        assert_eq!(letter(58), "F");
        assert_eq!(letter(60), "D-");
        assert_eq!(letter(62), "D-");
        assert_eq!(letter(63), "D");
        assert_eq!(letter(66), "D");
        assert_eq!(letter(67), "D+");
        assert_eq!(letter(69), "D+");
        assert_eq!(letter(70), "C-");
        assert_eq!(letter(76), "C");
        assert_eq!(letter(77), "C+");
        assert_eq!(letter(82), "B-");
        assert_eq!(letter(86), "B");
        assert_eq!(letter(89), "B+");
        assert_eq!(letter(90), "A-");
        assert_eq!(letter(94), "A");
        assert_eq!(letter(96), "A");
        assert_eq!(letter(97), "A+");
        assert_eq!(letter(99), "A+");
        assert_eq!(letter(100), "A+");
    }

    #[test]
    fn test_59_无对应等级() {
        assert_eq!(LetterGrade::from_value(59), Err(GradeRuleError::Unmapped(59)));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(LetterGrade::from_value(-1), Err(GradeRuleError::OutOfRange(-1)));
        assert_eq!(LetterGrade::from_value(101), Err(GradeRuleError::OutOfRange(101)));
    }

    #[test]
    fn test_serde_uses_display_text() {
        let json = serde_json::to_string(&LetterGrade::BPlus).unwrap();
        assert_eq!(json, "\"B+\"");

        let avg = AverageGrade::Letter(LetterGrade::AMinus);
        assert_eq!(serde_json::to_string(&avg).unwrap(), "\"A-\"");
        assert_eq!(serde_json::to_string(&AverageGrade::Numeric(94)).unwrap(), "94");
    }
}
