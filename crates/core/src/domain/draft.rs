use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Emirates accepted by the signup form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Abu Dhabi")]
    AbuDhabi,
    Dubai,
    Sharjah,
    Ajman,
    Fujairah,
    #[serde(rename = "Ras Al Khaimah")]
    RasAlKhaimah,
    #[serde(rename = "Umm Al Quwain")]
    UmmAlQuwain,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::AbuDhabi,
        Region::Dubai,
        Region::Sharjah,
        Region::Ajman,
        Region::Fujairah,
        Region::RasAlKhaimah,
        Region::UmmAlQuwain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::AbuDhabi => "Abu Dhabi",
            Region::Dubai => "Dubai",
            Region::Sharjah => "Sharjah",
            Region::Ajman => "Ajman",
            Region::Fujairah => "Fujairah",
            Region::RasAlKhaimah => "Ras Al Khaimah",
            Region::UmmAlQuwain => "Umm Al Quwain",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == trimmed)
            .ok_or_else(|| DomainError::UnknownRegion(trimmed.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    FullName,
    Email,
    Phone,
    Region,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::FullName => "full_name",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::Region => "region",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form input for a single signup attempt.
///
/// `region` is kept as raw text so the view can bind whatever the picklist
/// hands over; [`SubmissionDraft::region`] resolves it against [`Region`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub region: String,
}

impl SubmissionDraft {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            phone: phone.into(),
            region: region.into(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::FullName => self.full_name = value,
            DraftField::Email => self.email = value,
            DraftField::Phone => self.phone = value,
            DraftField::Region => self.region = value,
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::FullName => &self.full_name,
            DraftField::Email => &self.email,
            DraftField::Phone => &self.phone,
            DraftField::Region => &self.region,
        }
    }

    pub fn region(&self) -> Result<Region, DomainError> {
        self.region.parse()
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.region.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftField, Region, SubmissionDraft};
    use crate::errors::DomainError;

    #[test]
    fn region_parses_display_names() {
        for region in Region::ALL {
            assert_eq!(region.as_str().parse::<Region>(), Ok(region));
        }
        assert_eq!(" Dubai ".parse::<Region>(), Ok(Region::Dubai));
    }

    #[test]
    fn region_rejects_free_text() {
        assert_eq!("dubai".parse::<Region>(), Err(DomainError::UnknownRegion("dubai".to_owned())));
        assert!("Doha".parse::<Region>().is_err());
        assert!("".parse::<Region>().is_err());
    }

    #[test]
    fn region_serializes_with_display_name() {
        let json = serde_json::to_string(&Region::RasAlKhaimah).expect("serialize region");
        assert_eq!(json, "\"Ras Al Khaimah\"");
    }

    #[test]
    fn draft_field_set_and_clear() {
        let mut draft = SubmissionDraft::default();
        draft.set(DraftField::FullName, "Mariam Khan");
        draft.set(DraftField::Phone, "0501234567");
        assert_eq!(draft.get(DraftField::FullName), "Mariam Khan");
        assert_eq!(draft.get(DraftField::Phone), "0501234567");
        assert!(!draft.is_empty());

        draft.clear();
        assert!(draft.is_empty());
    }
}
