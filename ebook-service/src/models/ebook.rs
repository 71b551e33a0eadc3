use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// A downloadable eBook and the copy used to announce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbookRecord {
    pub key: String,
    pub subject: String,
    pub title: String,
    pub location_uri: String,
}

impl EbookRecord {
    pub fn new(
        key: impl Into<String>,
        subject: impl Into<String>,
        title: impl Into<String>,
        location_uri: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            subject: subject.into(),
            title: title.into(),
            location_uri: location_uri.into(),
        }
    }
}

/// Fixed lookup table from `ebookType` to the record it selects.
#[derive(Debug, Clone, Default)]
pub struct EbookCatalog {
    records: HashMap<String, EbookRecord>,
}

impl EbookCatalog {
    /// Catalog shipped with the service.
    pub fn builtin() -> Self {
        Self::from_records([
            EbookRecord::new(
                "free_stem_study_system",
                "🎉 Your FREE STEM Study System eBook is Here!",
                "The STEM Student's Secret Study System",
                "https://raw.githubusercontent.com/STEMSphere/stemsphereacademy/main/assets/The%20STEM%20Student%27s%20Secret%20Study%20System%20(1).pdf",
            ),
            EbookRecord::new(
                "free_college_prep_secrets",
                "🎉 Your FREE College Prep Secrets eBook is Here!",
                "College Prep Secrets for Parents",
                "https://raw.githubusercontent.com/STEMSphere/stemsphereacademy/main/assets/College%20Prep%20Secrets.pdf",
            ),
        ])
    }

    /// Later records replace earlier ones with the same key.
    pub fn from_records(records: impl IntoIterator<Item = EbookRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.key.clone(), record))
                .collect(),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&EbookRecord> {
        self.records.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Inbound payload of `POST /send-ebook`.
///
/// The address is forwarded to the provider unchanged; only emptiness is
/// rejected here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendEbookRequest {
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: String,
    pub name: String,
    pub ebook_type: String,
}
