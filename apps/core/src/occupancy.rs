use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete availability category shown as a marker icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyStatus {
    Zero,
    Low,
    Medium,
    High,
}

impl OccupancyStatus {
    pub const ALL: [Self; 4] = [Self::High, Self::Medium, Self::Low, Self::Zero];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Zero => "Full",
            Self::Low => "Few spaces",
            Self::Medium => "Some spaces",
            Self::High => "Plenty",
        }
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (in percent free) of the `High` and `Medium` categories.
/// Anything above zero but under `medium` is `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high: f64,
    pub medium: f64,
}

impl Thresholds {
    /// 40 / 35, the set the shipping map used.
    pub const fn coarse() -> Self {
        Self {
            high: 40.0,
            medium: 35.0,
        }
    }

    /// 75 / 50, the set of the alternate map variant.
    pub const fn quartile() -> Self {
        Self {
            high: 75.0,
            medium: 50.0,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::coarse()
    }
}

impl FromStr for Thresholds {
    type Err = String;

    /// Accepts `coarse`, `quartile`, or an explicit `high,medium` pair.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "coarse" => return Ok(Self::coarse()),
            "quartile" => return Ok(Self::quartile()),
            _ => {}
        }

        let (high, medium) = value
            .split_once(',')
            .ok_or_else(|| format!("unknown threshold set \"{value}\""))?;
        let high: f64 = high
            .trim()
            .parse()
            .map_err(|_| format!("invalid high threshold \"{}\"", high.trim()))?;
        let medium: f64 = medium
            .trim()
            .parse()
            .map_err(|_| format!("invalid medium threshold \"{}\"", medium.trim()))?;

        if !high.is_finite()
            || !medium.is_finite()
            || medium <= 0.0
            || high < medium
            || high > 100.0
        {
            return Err(format!(
                "thresholds must satisfy 0 < medium <= high <= 100, got {high},{medium}"
            ));
        }

        Ok(Self { high, medium })
    }
}

/// Free spaces as a percentage of capacity; `None` when the lot reports no
/// capacity at all.
pub fn percentage_free(free: i64, total: i64) -> Option<f64> {
    if total <= 0 {
        return None;
    }
    Some(free as f64 / total as f64 * 100.0)
}

pub fn classify(free: i64, total: i64, thresholds: &Thresholds) -> OccupancyStatus {
    percentage_free(free, total).map_or(OccupancyStatus::Zero, |percentage| {
        classify_percentage(percentage, thresholds)
    })
}

pub fn classify_percentage(percentage: f64, thresholds: &Thresholds) -> OccupancyStatus {
    if percentage >= thresholds.high {
        OccupancyStatus::High
    } else if percentage >= thresholds.medium {
        OccupancyStatus::Medium
    } else if percentage > 0.0 {
        OccupancyStatus::Low
    } else {
        // Also catches NaN.
        OccupancyStatus::Zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capacity_is_zero() {
        let thresholds = Thresholds::default();
        assert_eq!(classify(0, 0, &thresholds), OccupancyStatus::Zero);
        assert_eq!(classify(12, 0, &thresholds), OccupancyStatus::Zero);
        assert_eq!(classify(5, -3, &thresholds), OccupancyStatus::Zero);
    }

    #[test]
    fn coarse_boundaries() {
        let thresholds = Thresholds::coarse();
        assert_eq!(classify_percentage(40.0, &thresholds), OccupancyStatus::High);
        assert_eq!(classify_percentage(100.0, &thresholds), OccupancyStatus::High);
        assert_eq!(classify_percentage(39.999, &thresholds), OccupancyStatus::Medium);
        assert_eq!(classify_percentage(35.0, &thresholds), OccupancyStatus::Medium);
        assert_eq!(classify_percentage(34.999, &thresholds), OccupancyStatus::Low);
        assert_eq!(classify_percentage(0.001, &thresholds), OccupancyStatus::Low);
        assert_eq!(classify_percentage(0.0, &thresholds), OccupancyStatus::Zero);
        assert_eq!(classify_percentage(-4.0, &thresholds), OccupancyStatus::Zero);
        assert_eq!(classify_percentage(f64::NAN, &thresholds), OccupancyStatus::Zero);
    }

    #[test]
    fn quartile_boundaries() {
        let thresholds = Thresholds::quartile();
        assert_eq!(classify(75, 100, &thresholds), OccupancyStatus::High);
        assert_eq!(classify(74, 100, &thresholds), OccupancyStatus::Medium);
        assert_eq!(classify(50, 100, &thresholds), OccupancyStatus::Medium);
        assert_eq!(classify(49, 100, &thresholds), OccupancyStatus::Low);
        assert_eq!(classify(1, 100, &thresholds), OccupancyStatus::Low);
        assert_eq!(classify(0, 100, &thresholds), OccupancyStatus::Zero);
    }

    #[test]
    fn hsinchu_sample_lot_is_low() {
        // 22 of 292 spaces free is about 7.53%.
        let percentage = percentage_free(22, 292).unwrap();
        assert!((percentage - 7.534).abs() < 0.001);
        assert_eq!(classify(22, 292, &Thresholds::coarse()), OccupancyStatus::Low);
    }

    #[test]
    fn parses_threshold_sets() {
        assert_eq!("coarse".parse::<Thresholds>(), Ok(Thresholds::coarse()));
        assert_eq!(" Quartile ".parse::<Thresholds>(), Ok(Thresholds::quartile()));
        assert_eq!(
            "60, 30".parse::<Thresholds>(),
            Ok(Thresholds {
                high: 60.0,
                medium: 30.0
            })
        );
        assert!("30,60".parse::<Thresholds>().is_err());
        assert!("nan,30".parse::<Thresholds>().is_err());
        assert!("nan,nan".parse::<Thresholds>().is_err());
        assert!("inf,30".parse::<Thresholds>().is_err());
        assert!("generous".parse::<Thresholds>().is_err());
    }
}
