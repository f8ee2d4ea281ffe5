use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RegtrendError;

/// Vehicle class a manufacturer is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Two-wheelers (scooters, motorcycles).
    #[serde(rename = "2W")]
    TwoWheeler,
    /// Three-wheelers (autos, e-rickshaws, cargo carriers).
    #[serde(rename = "3W")]
    ThreeWheeler,
    /// Four-wheelers and heavier (cars, buses, construction equipment).
    #[serde(rename = "4W")]
    FourWheeler,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::TwoWheeler,
        Category::ThreeWheeler,
        Category::FourWheeler,
    ];

    /// The short label used in the interchange file and the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TwoWheeler => "2W",
            Category::ThreeWheeler => "3W",
            Category::FourWheeler => "4W",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RegtrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "2W" => Ok(Category::TwoWheeler),
            "3W" => Ok(Category::ThreeWheeler),
            "4W" => Ok(Category::FourWheeler),
            _ => Err(RegtrendError::InvalidCategory(s.to_string())),
        }
    }
}

/// Calendar month, keyed by its three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// 1-based month number (`JAN` = 1).
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// Inverse of [`Month::number`].
    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.get((n as usize).checked_sub(1)?).copied()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Month {
    type Err = RegtrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .find(|m| m.code() == code)
            .copied()
            .ok_or_else(|| RegtrendError::InvalidMonth(s.to_string()))
    }
}

/// Calendar quarter (`Q1` = Jan–Mar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    /// 1..=4
    pub quarter: u8,
}

impl Quarter {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: ((date.month0() / 3) + 1) as u8,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

/// One normalized row of the interchange file.
///
/// Field names match the CSV header `Maker,Month,Registrations,Year,Category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    #[serde(rename = "Maker")]
    pub maker: String,
    #[serde(rename = "Month")]
    pub month: Month,
    /// `None` when the source cell was blank or non-numeric.
    #[serde(rename = "Registrations", deserialize_with = "lenient_count")]
    pub registrations: Option<i64>,
    #[serde(rename = "Year")]
    pub year: i32,
    /// `None` when the maker is not in the category lookup.
    #[serde(rename = "Category")]
    pub category: Option<Category>,
}

/// Accepts `12`, `12.0` and blanks; pandas-written files carry float counts.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let t = raw.trim();
    if t.is_empty() {
        return Ok(None);
    }
    t.parse::<i64>()
        .ok()
        .or_else(|| t.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid registration count '{t}'")))
}

impl RegistrationRecord {
    /// First day of the record's month.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number(), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("2W".parse::<Category>().unwrap(), Category::TwoWheeler);
        assert_eq!(" 3w ".parse::<Category>().unwrap(), Category::ThreeWheeler);
        assert_eq!(Category::FourWheeler.to_string(), "4W");
        assert!("5W".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_ordering_follows_wheel_count() {
        let mut cats = vec![
            Category::FourWheeler,
            Category::TwoWheeler,
            Category::ThreeWheeler,
        ];
        cats.sort();
        assert_eq!(cats, Category::ALL.to_vec());
    }

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::Jan.number(), 1);
        assert_eq!(Month::Dec.number(), 12);
        assert_eq!(Month::from_number(4), Some(Month::Apr));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn test_month_parse_is_case_insensitive() {
        assert_eq!("jan".parse::<Month>().unwrap(), Month::Jan);
        assert_eq!(" SEP ".parse::<Month>().unwrap(), Month::Sep);
        assert!("JANUARY".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn test_quarter_from_date() {
        let d = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        assert_eq!(Quarter::from_date(d).to_string(), "2023Q1");
        let d = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(Quarter::from_date(d).to_string(), "2024Q4");
    }

    #[test]
    fn test_quarter_ordering() {
        let a = Quarter { year: 2023, quarter: 4 };
        let b = Quarter { year: 2024, quarter: 1 };
        assert!(a < b);
    }

    #[test]
    fn test_record_date() {
        let rec = RegistrationRecord {
            maker: "KIA".to_string(),
            month: Month::Jul,
            registrations: Some(10),
            year: 2024,
            category: Some(Category::FourWheeler),
        };
        assert_eq!(rec.date(), NaiveDate::from_ymd_opt(2024, 7, 1));
    }
}
