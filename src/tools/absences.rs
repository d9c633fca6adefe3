use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{ABSENCES_FILE, ToolError};

pub const TYPE_FIELD: &str = "Prombūtnes veids";
pub const NAME_FIELD: &str = "Darbinieka vārds un uzvārds";
pub const ID_FIELD: &str = "Darbinieka ID";
pub const DATE_FIELD: &str = "Prombūtnes datums";

/// Absence kinds the model may ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbsenceType {
    Vacation,
    BusinessTrip,
    SickLeave,
    NotInEmployment,
}

impl AbsenceType {
    pub const TOKENS: [&'static str; 4] =
        ["vacation", "business_trip", "sick_leave", "not_in_employment"];

    /// Unknown tokens yield `None`, which disables the criterion.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "vacation" => Some(AbsenceType::Vacation),
            "business_trip" => Some(AbsenceType::BusinessTrip),
            "sick_leave" => Some(AbsenceType::SickLeave),
            "not_in_employment" => Some(AbsenceType::NotInEmployment),
            _ => None,
        }
    }

    /// Value stored in the `Prombūtnes veids` field.
    pub fn record_value(self) -> &'static str {
        match self {
            AbsenceType::Vacation => "Atvaļinājums",
            AbsenceType::BusinessTrip => "Komandējums",
            AbsenceType::SickLeave => "Slimības lapa",
            AbsenceType::NotInEmployment => "Nav darba attiecībās",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbsenceArgs {
    type_of_absence: Option<String>,
    employee_name: Option<String>,
    employee_id: Option<String>,
    absence_start_date: Option<String>,
    absence_end_date: Option<String>,
}

/// Filter criteria; `None` means the criterion is not applied.
///
/// Both date bounds are inclusive. A bare `yyyy-mm-dd` end date covers the
/// whole day.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbsenceQuery {
    pub type_of_absence: Option<AbsenceType>,
    pub employee_name: Option<String>,
    pub employee_id: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl AbsenceQuery {
    pub fn from_arguments(raw: &str) -> Result<Self, ToolError> {
        let args: AbsenceArgs = serde_json::from_str(raw)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let start = args
            .absence_start_date
            .as_deref()
            .map(|raw| parse_argument_date("absenceStartDate", raw, false))
            .transpose()?;
        let end = args
            .absence_end_date
            .as_deref()
            .map(|raw| parse_argument_date("absenceEndDate", raw, true))
            .transpose()?;

        Ok(Self {
            type_of_absence: args.type_of_absence.as_deref().and_then(AbsenceType::from_token),
            employee_name: args.employee_name,
            employee_id: args.employee_id,
            start,
            end,
        })
    }

    /// True when the record passes every active criterion. A missing field
    /// passes the criterion that refers to it. A `null` type or id never
    /// matches, a `null` name passes and a `null` date is a data error.
    pub fn matches(&self, record: &Map<String, Value>) -> Result<bool, ToolError> {
        if let Some(kind) = self.type_of_absence {
            match field(record, TYPE_FIELD)? {
                Field::Missing => {}
                Field::Null => return Ok(false),
                Field::Text(value) => {
                    if fold(value) != fold(kind.record_value()) {
                        return Ok(false);
                    }
                }
            }
        }

        if let Some(name) = &self.employee_name {
            if let Field::Text(value) = field(record, NAME_FIELD)? {
                if !fold(value).contains(&fold(name)) {
                    return Ok(false);
                }
            }
        }

        if let Some(id) = &self.employee_id {
            match field(record, ID_FIELD)? {
                Field::Missing => {}
                Field::Null => return Ok(false),
                Field::Text(value) => {
                    if fold(value) != fold(id) {
                        return Ok(false);
                    }
                }
            }
        }

        if self.start.is_some() || self.end.is_some() {
            let date = match field(record, DATE_FIELD)? {
                Field::Missing => None,
                Field::Null => {
                    return Err(invalid_data(format!("'{DATE_FIELD}' is null")));
                }
                Field::Text(value) => Some(parse_date_time(value).ok_or_else(|| {
                    invalid_data(format!("'{DATE_FIELD}' value '{value}' is not a date"))
                })?),
            };
            if let Some(date) = date {
                if self.start.is_some_and(|start| date < start) {
                    return Ok(false);
                }
                if self.end.is_some_and(|end| date > end) {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}

/// Records satisfying `query`, in their original order and shape.
pub fn filter_absences(records: &[Value], query: &AbsenceQuery) -> Result<Vec<Value>, ToolError> {
    let mut matched = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or_else(|| invalid_data(format!("entry {index} is not an object")))?;
        if query.matches(object)? {
            matched.push(record.clone());
        }
    }
    Ok(matched)
}

pub(super) fn parse_document(text: &str) -> Result<Vec<Value>, ToolError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(invalid_data("expected a JSON array".to_string())),
        Err(e) => Err(invalid_data(e.to_string())),
    }
}

// Unicode default lowercase mapping; independent of the process locale.
fn fold(s: &str) -> String {
    s.to_lowercase()
}

enum Field<'a> {
    Missing,
    Null,
    Text(&'a str),
}

fn field<'a>(record: &'a Map<String, Value>, name: &str) -> Result<Field<'a>, ToolError> {
    match record.get(name) {
        None => Ok(Field::Missing),
        Some(Value::Null) => Ok(Field::Null),
        Some(Value::String(s)) => Ok(Field::Text(s)),
        Some(other) => Err(invalid_data(format!("'{name}' is not a string: {other}"))),
    }
}

fn parse_argument_date(arg: &str, raw: &str, end_of_day: bool) -> Result<NaiveDateTime, ToolError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = if end_of_day {
            NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        };
        if let Some(time) = time {
            return Ok(date.and_time(time));
        }
    }
    parse_date_time(raw).ok_or_else(|| {
        ToolError::InvalidArguments(format!("{arg} '{raw}' is not a date (expected yyyy-mm-dd)"))
    })
}

/// Accepts `yyyy-mm-dd`, `yyyy-mm-ddTHH:MM:SS[.f]` and RFC 3339 with offset.
/// Values without an offset are local already; values with one are
/// converted to the local clock.
pub(crate) fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Local).naive_local())
}

fn invalid_data(reason: String) -> ToolError {
    ToolError::InvalidData {
        file: ABSENCES_FILE.to_string(),
        reason,
    }
}
