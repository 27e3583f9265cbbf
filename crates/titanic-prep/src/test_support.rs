//! Shared fixtures for unit tests.

use polars::prelude::*;

/// Nine passengers from the canonical training export.
///
/// Ages present: 22, 38, 26, 35, 54, 2 (mean 29.5). Embarked mode is "S".
/// Fare quartiles are 8.05 / 53.1, so only the 512.3292 fare is an outlier.
pub(crate) fn titanic_df() -> DataFrame {
    df![
        "PassengerId" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9],
        "Survived" => [0i64, 1, 1, 1, 0, 0, 0, 0, 1],
        "Pclass" => [3i64, 1, 3, 1, 3, 3, 1, 3, 1],
        "Name" => [
            "Braund, Mr. Owen Harris",
            "Cumings, Mrs. John Bradley",
            "Heikkinen, Miss. Laina",
            "Futrelle, Mrs. Jacques Heath",
            "Allen, Mr. William Henry",
            "Moran, Mr. James",
            "McCarthy, Mr. Timothy J",
            "Palsson, Master. Gosta Leonard",
            "Ward, Miss. Anna",
        ],
        "Sex" => ["male", "female", "female", "female", "male", "male", "male", "male", "female"],
        "Age" => [Some(22.0), Some(38.0), Some(26.0), Some(35.0), None, None, Some(54.0), Some(2.0), None],
        "SibSp" => [1i64, 1, 0, 1, 0, 0, 0, 3, 0],
        "Parch" => [0i64, 0, 0, 0, 0, 0, 0, 1, 0],
        "Ticket" => [
            "A/5 21171", "PC 17599", "STON/O2. 3101282", "113803", "373450",
            "330877", "17463", "349909", "PC 17755",
        ],
        "Fare" => [7.25, 71.2833, 7.925, 53.1, 8.05, 8.4583, 51.8625, 21.075, 512.3292],
        "Cabin" => [None, Some("C85"), None, Some("C123"), None, None, Some("E46"), None, None],
        "Embarked" => [Some("S"), Some("C"), Some("S"), Some("S"), Some("S"), Some("Q"), Some("S"), Some("S"), None],
    ]
    .expect("fixture frame")
}
