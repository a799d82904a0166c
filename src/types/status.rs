use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::ValidationError;

/// Reading progress of a single book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Abandoned")]
    Abandoned,
    #[serde(rename = "Waiting For Next Book")]
    WaitingForNextBook,
}

impl ReadStatus {
    pub const ALL: [ReadStatus; 5] = [
        ReadStatus::NotStarted,
        ReadStatus::InProgress,
        ReadStatus::Completed,
        ReadStatus::Abandoned,
        ReadStatus::WaitingForNextBook,
    ];

    /// The literal used in documents and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::NotStarted => "Not Started",
            ReadStatus::InProgress => "In Progress",
            ReadStatus::Completed => "Completed",
            ReadStatus::Abandoned => "Abandoned",
            ReadStatus::WaitingForNextBook => "Waiting For Next Book",
        }
    }
}

/// Lifecycle state of a series. Only persisted states live here, see [SeriesFilter] for the
/// "Everything" pseudo state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeriesStatus {
    #[serde(rename = "Reading")]
    Reading,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Waiting For Next Book")]
    WaitingForNextBook,
    #[serde(rename = "Inactive")]
    Inactive,
    #[serde(rename = "Not a series")]
    NotASeries,
    #[serde(rename = "Abandoned")]
    Abandoned,
    #[serde(rename = "Needs Investigation")]
    NeedsInvestigation,
    #[default]
    #[serde(rename = "Undetermined")]
    Undetermined,
}

impl SeriesStatus {
    pub const ALL: [SeriesStatus; 9] = [
        SeriesStatus::Reading,
        SeriesStatus::InProgress,
        SeriesStatus::Completed,
        SeriesStatus::WaitingForNextBook,
        SeriesStatus::Inactive,
        SeriesStatus::NotASeries,
        SeriesStatus::Abandoned,
        SeriesStatus::NeedsInvestigation,
        SeriesStatus::Undetermined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesStatus::Reading => "Reading",
            SeriesStatus::InProgress => "In Progress",
            SeriesStatus::Completed => "Completed",
            SeriesStatus::WaitingForNextBook => "Waiting For Next Book",
            SeriesStatus::Inactive => "Inactive",
            SeriesStatus::NotASeries => "Not a series",
            SeriesStatus::Abandoned => "Abandoned",
            SeriesStatus::NeedsInvestigation => "Needs Investigation",
            SeriesStatus::Undetermined => "Undetermined",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            SeriesStatus::Reading => "read",
            SeriesStatus::InProgress => "prg",
            SeriesStatus::Completed => "cmp",
            SeriesStatus::WaitingForNextBook => "wait",
            SeriesStatus::Inactive => "!act",
            SeriesStatus::NotASeries => "not",
            SeriesStatus::Abandoned => "abnd",
            SeriesStatus::NeedsInvestigation => "nvst",
            SeriesStatus::Undetermined => "!det",
        }
    }
}

/// Selection of series by status, used when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesFilter {
    #[default]
    Everything,
    Only(SeriesStatus),
}

impl SeriesFilter {
    pub fn matches(&self, status: SeriesStatus) -> bool {
        match self {
            SeriesFilter::Everything => true,
            SeriesFilter::Only(s) => *s == status,
        }
    }
}

/// Loose key for matching user input against status literals: case, spaces, dashes and
/// underscores are ignored, so `in-progress` finds "In Progress".
fn loose(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl FromStr for ReadStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = loose(s);
        Self::ALL
            .into_iter()
            .find(|x| loose(x.as_str()) == key)
            .ok_or_else(|| ValidationError::new("readStatus", format!("unknown status {s:?}")))
    }
}

impl FromStr for SeriesStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = loose(s);
        Self::ALL
            .into_iter()
            .find(|x| loose(x.as_str()) == key)
            .ok_or_else(|| ValidationError::new("status", format!("unknown status {s:?}")))
    }
}

impl FromStr for SeriesFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if loose(s) == "everything" {
            return Ok(SeriesFilter::Everything);
        }
        s.parse().map(SeriesFilter::Only)
    }
}

impl Display for ReadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for SeriesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for SeriesFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesFilter::Everything => write!(f, "Everything"),
            SeriesFilter::Only(s) => write!(f, "{}", s),
        }
    }
}

// Both status enums are stored as their literal.
macro_rules! sqlite_text_enum {
    ($t:ty) => {
        impl sqlx::Type<sqlx::Sqlite> for $t {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <&str as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $t {
            fn encode_by_ref(
                &self,
                args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> sqlx::encode::IsNull {
                args.push(sqlx::sqlite::SqliteArgumentValue::Text(
                    std::borrow::Cow::Borrowed(self.as_str()),
                ));

                sqlx::encode::IsNull::No
            }
        }

        impl<'r, DB: sqlx::Database> sqlx::Decode<'r, DB> for $t
        where
            &'r str: sqlx::Decode<'r, DB>,
        {
            fn decode(
                value: <DB as sqlx::database::HasValueRef<'r>>::ValueRef,
            ) -> Result<Self, Box<dyn std::error::Error + 'static + Send + Sync>> {
                let value = <&str as sqlx::Decode<DB>>::decode(value)?;
                Ok(value.parse::<$t>()?)
            }
        }
    };
}

sqlite_text_enum!(ReadStatus);
sqlite_text_enum!(SeriesStatus);
