use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// Snapshot of `ios.cfw.guide/main.json`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FirmwareCatalog {
    #[serde(default)]
    pub ios: Vec<FirmwareEntry>,
    #[serde(default)]
    pub jailbreak: Vec<JailbreakApp>,
    #[serde(default)]
    pub groups: Vec<DeviceGroup>,
}

/// A single firmware release.
#[derive(Clone, Debug, Deserialize)]
pub struct FirmwareEntry {
    pub version: String,
    #[serde(default)]
    pub build: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub released: Option<String>,
    #[serde(default)]
    pub beta: bool,
    /// Device identifiers in document order. Upstream encodes these as an
    /// object keyed by identifier.
    #[serde(default, deserialize_with = "device_ids")]
    pub devices: Option<Vec<String>>,
}

impl FirmwareEntry {
    pub fn first_device(&self) -> Option<&str> {
        self.devices
            .as_deref()
            .and_then(|devices| devices.first())
            .map(String::as_str)
    }

    pub fn supports_device(&self, device_id: &str) -> bool {
        self.devices
            .as_deref()
            .is_some_and(|devices| devices.iter().any(|id| id == device_id))
    }

    /// Release date used for ordering; undated releases sort as the epoch.
    pub fn release_date(&self) -> &str {
        self.released
            .as_deref()
            .filter(|date| !date.is_empty())
            .unwrap_or("1970-01-01")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct JailbreakApp {
    pub name: String,
    #[serde(default)]
    pub info: Option<serde_json::Value>,
}

impl JailbreakApp {
    pub fn website_url(&self) -> Option<&str> {
        self.info.as_ref()?.get("website")?.get("url")?.as_str()
    }

    pub fn kind(&self) -> Option<&str> {
        self.info.as_ref()?.get("type")?.as_str()
    }
}

/// Device family, optionally split into subgroups.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DeviceGroup {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "device_id_list")]
    pub devices: Vec<String>,
    #[serde(default)]
    pub subgroups: Option<Vec<DeviceGroup>>,
}

impl DeviceGroup {
    /// Case-insensitive equality against the group name or any identifier.
    pub fn is_named(&self, wanted_lower: &str) -> bool {
        self.name.to_lowercase() == wanted_lower
            || self
                .devices
                .iter()
                .any(|device| device.to_lowercase() == wanted_lower)
    }

    /// Case-insensitive substring match against the group name or any identifier.
    pub fn mentions(&self, partial_lower: &str) -> bool {
        self.name.to_lowercase().contains(partial_lower)
            || self
                .devices
                .iter()
                .any(|device| device.to_lowercase().contains(partial_lower))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositorySearch {
    #[serde(default)]
    pub data: Option<Vec<Repository>>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

fn device_ids<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DeviceIdsVisitor)
}

fn device_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(device_ids(deserializer)?.unwrap_or_default())
}

/// Accepts either `["iPhone1,1", ...]` or `{"iPhone1,1": {...}, ...}`.
struct DeviceIdsVisitor;

impl<'de> Visitor<'de> for DeviceIdsVisitor {
    type Value = Option<Vec<String>>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a list of device identifiers or an object keyed by identifier")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut ids = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(id) = seq.next_element::<String>()? {
            ids.push(id);
        }
        Ok(Some(ids))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut ids = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((id, _)) = map.next_entry::<String, IgnoredAny>()? {
            ids.push(id);
        }
        Ok(Some(ids))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FirmwareCatalog, RepositorySearch};

    #[test]
    fn firmware_devices_keep_document_order() {
        let catalog: FirmwareCatalog = serde_json::from_str(
            r#"{
                "ios": [{
                    "version": "14.2",
                    "build": "18B92",
                    "released": "2020-11-05",
                    "beta": false,
                    "devices": { "iPhone9,1": {}, "iPhone8,1": {}, "iPad7,5": {} }
                }]
            }"#,
        )
        .unwrap();

        let entry = &catalog.ios[0];
        assert_eq!(
            entry.devices.as_deref().unwrap(),
            ["iPhone9,1", "iPhone8,1", "iPad7,5"]
        );
        assert_eq!(entry.first_device(), Some("iPhone9,1"));
        assert!(entry.supports_device("iPad7,5"));
    }

    #[test]
    fn optional_firmware_fields_default() {
        let catalog: FirmwareCatalog = serde_json::from_value(json!({
            "ios": [{ "version": "1.0", "build": "1A543a", "released": false, "devices": null }]
        }))
        .unwrap();

        let entry = &catalog.ios[0];
        assert!(!entry.beta);
        assert_eq!(entry.devices, None);
        assert_eq!(entry.first_device(), None);
        assert_eq!(entry.release_date(), "1970-01-01");
    }

    #[test]
    fn groups_and_jailbreaks_parse() {
        let catalog: FirmwareCatalog = serde_json::from_value(json!({
            "jailbreak": [{
                "name": "checkra1n",
                "info": { "type": "Semi-tethered", "website": { "url": "https://checkra.in/" } }
            }],
            "groups": [{
                "name": "iPhone 6s",
                "type": "iPhone",
                "order": 12,
                "devices": ["iPhone8,1"],
                "subgroups": [{ "name": "iPhone 6s (GSM)", "devices": ["iPhone8,1"] }]
            }]
        }))
        .unwrap();

        assert_eq!(catalog.jailbreak[0].kind(), Some("Semi-tethered"));
        assert_eq!(catalog.jailbreak[0].website_url(), Some("https://checkra.in/"));
        assert_eq!(catalog.groups[0].kind.as_deref(), Some("iPhone"));
        assert_eq!(catalog.groups[0].subgroups.as_ref().unwrap().len(), 1);
        assert!(catalog.groups[0].is_named("iphone8,1"));
        assert!(catalog.groups[0].mentions("6s"));
    }

    #[test]
    fn repository_search_tolerates_null_slugs() {
        let search: RepositorySearch = serde_json::from_value(json!({
            "status": "200 OK",
            "data": [
                { "slug": "chariz", "name": "Chariz", "uri": "https://repo.chariz.com" },
                { "slug": null, "name": "Nameless" }
            ]
        }))
        .unwrap();

        let repos = search.data.unwrap();
        assert_eq!(repos[0].slug.as_deref(), Some("chariz"));
        assert_eq!(repos[1].slug, None);
        assert_eq!(repos[1].uri, None);
    }
}
