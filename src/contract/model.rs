use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Enrollment stage. Unknown values are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    Kindergarten,
    Elementary,
    Middle,
    High,
    Other(String),
}

impl From<String> for Stage {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Kindergarten" => Self::Kindergarten,
            "Elementary" => Self::Elementary,
            "Middle" => Self::Middle,
            "High" => Self::High,
            _ => Self::Other(value),
        }
    }
}

impl From<Stage> for String {
    fn from(value: Stage) -> Self {
        value.as_str().to_string()
    }
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kindergarten => "Kindergarten",
            Self::Elementary => "Elementary",
            Self::Middle => "Middle",
            Self::High => "High",
            Self::Other(raw) => raw,
        }
    }
}

/// Gender track of the requested school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchoolTrack {
    Boys,
    Girls,
    Other(String),
}

impl From<String> for SchoolTrack {
    fn from(value: String) -> Self {
        match value.as_str() {
            "boys" => Self::Boys,
            "girls" => Self::Girls,
            _ => Self::Other(value),
        }
    }
}

impl From<SchoolTrack> for String {
    fn from(value: SchoolTrack) -> Self {
        value.as_str().to_string()
    }
}

impl SchoolTrack {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Boys => "boys",
            Self::Girls => "girls",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_girls(&self) -> bool {
        matches!(self, Self::Girls)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentType {
    Annual,
    Quarterly,
    Other(String),
}

impl From<String> for PaymentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Annual" => Self::Annual,
            "Quarterly" => Self::Quarterly,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentType> for String {
    fn from(value: PaymentType) -> Self {
        value.as_str().to_string()
    }
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Annual => "Annual",
            Self::Quarterly => "Quarterly",
            Self::Other(raw) => raw,
        }
    }
}

/// Bus route selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransportationPath {
    OnePath,
    TwoPaths,
    Other(String),
}

impl From<String> for TransportationPath {
    fn from(value: String) -> Self {
        match value.as_str() {
            "One path" => Self::OnePath,
            "Two paths" => Self::TwoPaths,
            _ => Self::Other(value),
        }
    }
}

impl From<TransportationPath> for String {
    fn from(value: TransportationPath) -> Self {
        value.as_str().to_string()
    }
}

impl TransportationPath {
    pub fn as_str(&self) -> &str {
        match self {
            Self::OnePath => "One path",
            Self::TwoPaths => "Two paths",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub mobile_number: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sibling {
    pub name: Option<String>,
    pub school: Option<String>,
    #[schema(value_type = Option<String>, example = "Middle")]
    pub stage: Option<Stage>,
    pub grade: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub relationship: Option<String>,
    pub absher_mobile_number: Option<String>,
    pub additional_mobile_number: Option<String>,
    pub residential_address: Option<String>,
    pub profession: Option<String>,
    pub work_address: Option<String>,
    pub work_phone_number: Option<String>,
    pub extension: Option<String>,
    #[serde(default)]
    pub contact_persons: Vec<ContactPerson>,
}

/// Person filling in the contract on the guardian's behalf.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractEditor {
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub relationship: Option<String>,
    pub absher_mobile_number: Option<String>,
    pub additional_mobile_number: Option<String>,
    pub residential_address: Option<String>,
    pub profession: Option<String>,
    pub work_address: Option<String>,
    pub work_phone_number: Option<String>,
    pub extension: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub birth_place: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub birth_date: Option<NaiveDate>,
    pub id_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub id_issue_date: Option<NaiveDate>,
    pub id_issue_place: Option<String>,
    pub previously_enrolled: Option<bool>,
    pub previous_school_name: Option<String>,
    pub previous_school_city: Option<String>,
    pub previous_school_type: Option<String>,
    #[schema(value_type = Option<String>, example = "girls")]
    pub required_school: Option<SchoolTrack>,
    #[schema(value_type = Option<String>, example = "Elementary")]
    pub required_stage: Option<Stage>,
    /// Free text, usually prefixed with "الصف ".
    pub required_grade: Option<String>,
    pub has_siblings_in_ithraa: Option<bool>,
    #[serde(default)]
    pub siblings: Vec<Sibling>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transportation {
    pub required: Option<bool>,
    pub neighborhood: Option<String>,
    #[schema(value_type = Option<String>, example = "One path")]
    pub path: Option<TransportationPath>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[schema(value_type = Option<String>, example = "Annual")]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub transportation: Transportation,
}

/// Enrollment contract as stored by the registration system.
#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub guardian: Option<Guardian>,
    pub contract_editor: Option<ContractEditor>,
    pub student: Option<Student>,
    pub payment: Option<Payment>,
}

/// Accepts `YYYY-MM-DD` as well as full RFC 3339 timestamps and keeps the date part.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid date '{trimmed}'")))
}
