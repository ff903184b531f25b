// ==========================================
// 生猪运输排程仿真 - 日龄参考表
// ==========================================
// 用途: 体重-日龄表 / 采食量-日龄表
// 查表规则: 阶梯函数, 取 age <= 查询值 的最后一个档位
//           低于首档取首档, 超出末档保持末档 (不外推)
// ==========================================

use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};

/// 单个日龄档位
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub age_weeks: f64,
    pub value: f64,
}

// ==========================================
// AgeTable - 阶梯查表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeTable {
    name: String,
    brackets: Vec<AgeBracket>,
}

impl AgeTable {
    /// 构建并校验
    ///
    /// # 校验
    /// - 至少一个档位
    /// - 日龄、数值均为有限值
    /// - 日龄严格递增 (输入可乱序, 内部排序后校验重复)
    pub fn new(
        name: impl Into<String>,
        mut brackets: Vec<AgeBracket>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if brackets.is_empty() {
            return Err(ValidationError::InvalidAgeTable {
                table: name,
                message: "表为空".to_string(),
            });
        }
        if let Some(bad) = brackets
            .iter()
            .find(|b| !b.age_weeks.is_finite() || !b.value.is_finite())
        {
            return Err(ValidationError::InvalidAgeTable {
                table: name,
                message: format!("非有限值: age={}, value={}", bad.age_weeks, bad.value),
            });
        }

        brackets.sort_by(|a, b| a.age_weeks.total_cmp(&b.age_weeks));
        if let Some(pair) = brackets.windows(2).find(|w| w[0].age_weeks == w[1].age_weeks) {
            return Err(ValidationError::InvalidAgeTable {
                table: name,
                message: format!("日龄重复: {}", pair[0].age_weeks),
            });
        }

        Ok(Self { name, brackets })
    }

    pub fn from_pairs(
        name: impl Into<String>,
        pairs: &[(f64, f64)],
    ) -> Result<Self, ValidationError> {
        let brackets = pairs
            .iter()
            .map(|&(age_weeks, value)| AgeBracket { age_weeks, value })
            .collect();
        Self::new(name, brackets)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brackets(&self) -> &[AgeBracket] {
        &self.brackets
    }

    /// 查询档位下标 (阶梯)
    pub fn bracket_index(&self, age_weeks: f64) -> usize {
        // brackets 非空且已排序
        match self
            .brackets
            .iter()
            .rposition(|b| b.age_weeks <= age_weeks)
        {
            Some(idx) => idx,
            None => 0,
        }
    }

    /// 阶梯查值
    pub fn lookup(&self, age_weeks: f64) -> f64 {
        self.brackets[self.bracket_index(age_weeks)].value
    }

    /// 档位斜率 (每周变化量)
    ///
    /// 档位 i 的斜率 = (value[i+1] - value[i]) / (age[i+1] - age[i]);
    /// 末档位沿用前一档位斜率; 仅一个档位时为 0
    pub fn weekly_slope(&self, age_weeks: f64) -> f64 {
        let n = self.brackets.len();
        if n < 2 {
            return 0.0;
        }
        let idx = self.bracket_index(age_weeks).min(n - 2);
        let a = self.brackets[idx];
        let b = self.brackets[idx + 1];
        (b.value - a.value) / (b.age_weeks - a.age_weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_table() -> AgeTable {
        AgeTable::from_pairs("weight", &[(20.0, 80.0), (10.0, 30.0), (24.0, 110.0)]).unwrap()
    }

    #[test]
    fn test_stepwise_lookup() {
        let t = weight_table();
        assert_eq!(t.lookup(5.0), 30.0); // 低于首档
        assert_eq!(t.lookup(10.0), 30.0);
        assert_eq!(t.lookup(19.9), 30.0);
        assert_eq!(t.lookup(20.0), 80.0);
        assert_eq!(t.lookup(30.0), 110.0); // 超出末档保持
    }

    #[test]
    fn test_weekly_slope_holds_last_bracket() {
        let t = weight_table();
        assert_eq!(t.weekly_slope(12.0), 5.0); // (80-30)/10
        assert_eq!(t.weekly_slope(22.0), 7.5); // (110-80)/4
        assert_eq!(t.weekly_slope(40.0), 7.5);
        assert_eq!(t.weekly_slope(1.0), 5.0);
    }

    #[test]
    fn test_rejects_duplicate_ages() {
        let err = AgeTable::from_pairs("weight", &[(10.0, 1.0), (10.0, 2.0)]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAgeTable { .. }));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(AgeTable::new("consumption", vec![]).is_err());
    }
}
