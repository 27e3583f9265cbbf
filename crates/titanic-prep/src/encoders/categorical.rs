//! Column encoders.
//!
//! Every encoder is total over its declared domain and rejects anything else
//! with [`PreprocessingError::Domain`]. Encoders accept text columns only;
//! feeding an already encoded (integer) column back in is out of domain.

use crate::error::{PreprocessingError, Result};
use crate::types::columns;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// A ticket is numeric when it consists solely of decimal digits.
static NUMERIC_TICKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("Invalid regex: numeric ticket"));

/// `Sex` codes.
pub const SEX_CODES: [(&str, i64); 2] = [("male", 1), ("female", 0)];

/// `Embarked` codes (Southampton, Cherbourg, Queenstown).
pub const EMBARKED_CODES: [(&str, i64); 3] = [("S", 0), ("C", 1), ("Q", 2)];

/// Stateless column encoders.
pub struct CategoricalEncoder;

impl CategoricalEncoder {
    /// Map each value through a fixed lookup table.
    pub fn map_categories(series: &Series, mapping: &[(&str, i64)]) -> Result<Series> {
        let name = series.name().to_string();
        let values = Self::text_values(series)?;

        let encoded = values
            .into_iter()
            .map(|val| {
                let val = val.ok_or_else(|| {
                    PreprocessingError::domain(&name, "null", "missing value cannot be encoded")
                })?;
                mapping
                    .iter()
                    .find(|(key, _)| *key == val)
                    .map(|(_, code)| *code)
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = mapping.iter().map(|(key, _)| *key).collect();
                        PreprocessingError::domain(
                            &name,
                            val,
                            format!("expected one of {}", allowed.join(", ")),
                        )
                    })
            })
            .collect::<Result<Vec<i64>>>()?;

        Ok(Series::new(series.name().clone(), encoded))
    }

    /// Encode `Sex`: male -> 1, female -> 0.
    pub fn encode_sex(series: &Series) -> Result<Series> {
        Self::map_categories(series, &SEX_CODES)
    }

    /// Encode `Embarked`: S -> 0, C -> 1, Q -> 2.
    pub fn encode_embarked(series: &Series) -> Result<Series> {
        Self::map_categories(series, &EMBARKED_CODES)
    }

    /// Encode `Cabin` as a "has cabin info" flag: `unknown_marker` -> 0, anything else -> 1.
    pub fn encode_cabin(series: &Series, unknown_marker: &str) -> Result<Series> {
        let name = series.name().to_string();
        let encoded = Self::text_values(series)?
            .into_iter()
            .map(|val| match val {
                Some(v) => Ok(i64::from(v != unknown_marker)),
                None => Err(PreprocessingError::domain(
                    &name,
                    "null",
                    "cabin must be imputed before encoding",
                )),
            })
            .collect::<Result<Vec<i64>>>()?;

        Ok(Series::new(series.name().clone(), encoded))
    }

    /// Encode `Ticket` as a "purely numeric ticket" flag.
    pub fn encode_ticket(series: &Series) -> Result<Series> {
        let name = series.name().to_string();
        let encoded = Self::text_values(series)?
            .into_iter()
            .map(|val| match val {
                Some("") => Err(PreprocessingError::domain(&name, "", "empty ticket")),
                Some(v) => Ok(i64::from(is_numeric_ticket(v))),
                None => Err(PreprocessingError::domain(&name, "null", "missing ticket")),
            })
            .collect::<Result<Vec<i64>>>()?;

        Ok(Series::new(series.name().clone(), encoded))
    }

    fn text_values(series: &Series) -> Result<Vec<Option<&str>>> {
        match series.dtype() {
            DataType::String => Ok(series.str()?.into_iter().collect()),
            other => Err(PreprocessingError::domain(
                series.name().as_str(),
                other.to_string(),
                "expected a text column",
            )),
        }
    }
}

/// True when the whole ticket string is decimal digits.
pub fn is_numeric_ticket(ticket: &str) -> bool {
    NUMERIC_TICKET.is_match(ticket)
}

/// Columns rewritten by the encoding stage, in application order.
pub(crate) const ENCODED_COLUMNS: [&str; 4] = [
    columns::SEX,
    columns::EMBARKED,
    columns::CABIN,
    columns::TICKET,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(series: &Series) -> Vec<i64> {
        series.i64().unwrap().into_iter().flatten().collect()
    }

    #[test]
    fn test_encode_sex() {
        let series = Series::new("Sex".into(), &["male", "female", "male"]);
        let encoded = CategoricalEncoder::encode_sex(&series).unwrap();
        assert_eq!(codes(&encoded), vec![1, 0, 1]);
        assert_eq!(encoded.dtype(), &DataType::Int64);
    }

    #[test]
    fn test_encode_sex_rejects_unknown_value() {
        let series = Series::new("Sex".into(), &["male", "Male"]);
        let err = CategoricalEncoder::encode_sex(&series).unwrap_err();
        match err {
            PreprocessingError::Domain { column, value, .. } => {
                assert_eq!(column, "Sex");
                assert_eq!(value, "Male");
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_sex_rejects_null() {
        let series = Series::new("Sex".into(), &[Some("female"), None]);
        assert!(CategoricalEncoder::encode_sex(&series).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_encode_sex_twice_is_out_of_domain() {
        let series = Series::new("Sex".into(), &["male", "female"]);
        let encoded = CategoricalEncoder::encode_sex(&series).unwrap();
        let err = CategoricalEncoder::encode_sex(&encoded).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_encode_embarked() {
        let series = Series::new("Embarked".into(), &["S", "C", "Q", "S"]);
        let encoded = CategoricalEncoder::encode_embarked(&series).unwrap();
        assert_eq!(codes(&encoded), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_encode_embarked_rejects_unknown_port() {
        let series = Series::new("Embarked".into(), &["S", "X"]);
        let err = CategoricalEncoder::encode_embarked(&series).unwrap_err();
        assert!(err.to_string().contains("expected one of S, C, Q"));
    }

    #[test]
    fn test_encode_cabin() {
        let series = Series::new("Cabin".into(), &["Unknown", "C85", "B57 B59 B63 B66", "Unknown"]);
        let encoded = CategoricalEncoder::encode_cabin(&series, "Unknown").unwrap();
        assert_eq!(codes(&encoded), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_encode_cabin_rejects_null() {
        let series = Series::new("Cabin".into(), &[Some("C85"), None]);
        assert!(CategoricalEncoder::encode_cabin(&series, "Unknown").is_err());
    }

    #[test]
    fn test_encode_ticket() {
        let series = Series::new(
            "Ticket".into(),
            &["113803", "A/5 21171", "PC 17599", "3101282", "12 34", "-5"],
        );
        let encoded = CategoricalEncoder::encode_ticket(&series).unwrap();
        assert_eq!(codes(&encoded), vec![1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_encode_ticket_rejects_empty_and_null() {
        let empty = Series::new("Ticket".into(), &["113803", ""]);
        assert!(CategoricalEncoder::encode_ticket(&empty).unwrap_err().is_domain_error());

        let null = Series::new("Ticket".into(), &[Some("113803"), None]);
        assert!(CategoricalEncoder::encode_ticket(&null).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_encode_ticket_rejects_non_text() {
        let series = Series::new("Ticket".into(), &[113803i64]);
        assert!(CategoricalEncoder::encode_ticket(&series).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_is_numeric_ticket() {
        assert!(is_numeric_ticket("349909"));
        assert!(!is_numeric_ticket("STON/O2. 3101282"));
        assert!(!is_numeric_ticket(""));
        assert!(!is_numeric_ticket("1.5"));
    }
}
