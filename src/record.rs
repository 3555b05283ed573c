use serde::Serialize;


/// Stands in for every location field when the carried location cannot be geocoded.
pub(crate) const LOCATION_NOT_FOUND: &str = "Location not found";


/// Location fields of a record. Fields that could not be resolved are left out of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct LocationFields {
    #[serde(rename = "JobLocationCity", skip_serializing_if = "Option::is_none")]
    pub(crate) city: Option<String>,
    #[serde(rename = "JobLocationLocality", skip_serializing_if = "Option::is_none")]
    pub(crate) locality: Option<String>,
    #[serde(rename = "JobLocationCountry", skip_serializing_if = "Option::is_none")]
    pub(crate) country: Option<String>,
    #[serde(rename = "JobLocationCountryCode", skip_serializing_if = "Option::is_none")]
    pub(crate) country_code: Option<String>,
    #[serde(rename = "JobLocation", skip_serializing_if = "Option::is_none")]
    pub(crate) location: Option<String>,
    #[serde(rename = "JobLocationText", skip_serializing_if = "Option::is_none")]
    pub(crate) location_text: Option<String>
}


/// Outcome of geocoding the location carried from a listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LocationResolution {
    Resolved(LocationFields),
    NotFound
}


impl From<LocationResolution> for LocationFields {
    fn from(value: LocationResolution) -> Self {
        match value {
            LocationResolution::Resolved(fields) => fields,
            LocationResolution::NotFound => Self {
                location: Some(LOCATION_NOT_FOUND.to_string()),
                ..Default::default()
            }
        }
    }
}


/// One harvested job posting, emitted once per successfully parsed detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct JobRecord {
    #[serde(rename = "JobTitle")]
    pub(crate) title: String,
    #[serde(flatten)]
    pub(crate) location: LocationFields,
    #[serde(rename = "CleanContent")]
    pub(crate) clean_content: String,
    #[serde(rename = "Skills")]
    pub(crate) skills: Vec<String>,
    #[serde(rename = "JobContactEmails", skip_serializing_if = "Option::is_none")]
    pub(crate) contact_email: Option<String>,
    #[serde(rename = "JobContactPhone", skip_serializing_if = "Option::is_none")]
    pub(crate) contact_phone: Option<String>,
    #[serde(rename = "JobUrl")]
    pub(crate) url: String
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(location: LocationResolution) -> JobRecord {
        JobRecord {
            title: "Software Engineer".to_string(),
            location: location.into(),
            clean_content: " Build things ".to_string(),
            skills: vec!["things".to_string()],
            contact_email: None,
            contact_phone: Some("44 123 45 67".to_string()),
            url: "https://www.google.com/about/careers/applications/jobs/results/1".to_string()
        }
    }

    #[test]
    fn unresolved_fields_are_omitted() {
        let location = LocationFields {
            country: Some("Switzerland".to_string()),
            location: Some("Switzerland".to_string()),
            location_text: Some("Switzerland".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(record(LocationResolution::Resolved(location))).unwrap();
        assert_eq!(value, json!({
            "JobTitle": "Software Engineer",
            "JobLocationCountry": "Switzerland",
            "JobLocation": "Switzerland",
            "JobLocationText": "Switzerland",
            "CleanContent": " Build things ",
            "Skills": ["things"],
            "JobContactPhone": "44 123 45 67",
            "JobUrl": "https://www.google.com/about/careers/applications/jobs/results/1"
        }));
    }

    #[test]
    fn not_found_becomes_a_single_placeholder_field() {
        let value = serde_json::to_value(record(LocationResolution::NotFound)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["JobLocation"], LOCATION_NOT_FOUND);
        assert_eq!(object["JobTitle"], "Software Engineer");
        let location_keys: Vec<&str> = object
            .keys()
            .map(String::as_str)
            .filter(|k| k.starts_with("JobLocation"))
            .collect();
        assert_eq!(location_keys, ["JobLocation"]);
    }
}
