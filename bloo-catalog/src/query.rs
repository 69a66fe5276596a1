//! Suggestion queries over catalog snapshots.
//!
//! Every function here is pure and caps its output at
//! [`MAX_SUGGESTIONS`](bloo_utils::suggest::MAX_SUGGESTIONS).

use std::cmp::Reverse;

use bloo_utils::suggest::MAX_SUGGESTIONS;

use crate::model::{DeviceGroup, FirmwareCatalog, FirmwareEntry, JailbreakApp, Repository};

/// Device types that cannot be jailbroken and are left out of jailbreak device pickers.
const NON_JAILBREAKABLE_TYPES: &[&str] = &["TV", "Watch"];

/// Name of the operating system a firmware release belongs to.
pub fn resolve_os_version(entry: &FirmwareEntry) -> &'static str {
    let Some(first_device) = entry.first_device() else {
        return "iOS";
    };

    if first_device.starts_with("AppleTV") {
        "tvOS"
    } else if first_device.starts_with("Watch") {
        "watchOS"
    } else if first_device.starts_with("iPhone")
        && major_version(&entry.version).is_some_and(|major| major < 3)
    {
        "iPhoneOS"
    } else {
        "iOS"
    }
}

fn major_version(version: &str) -> Option<i64> {
    version.split('.').next()?.trim().parse().ok()
}

/// Replace every group that has subgroups by those subgroups, which inherit
/// the parent's `order`. Only one level is flattened.
pub fn transform_groups(groups: &[DeviceGroup]) -> Vec<DeviceGroup> {
    let mut flattened = Vec::with_capacity(groups.len());
    for group in groups {
        match &group.subgroups {
            Some(subgroups) => flattened.extend(subgroups.iter().map(|subgroup| DeviceGroup {
                order: group.order,
                ..subgroup.clone()
            })),
            None => flattened.push(group.clone()),
        }
    }
    flattened
}

/// `"{os} {version} ({build})"` as shown in firmware pickers.
pub fn firmware_label(entry: &FirmwareEntry) -> String {
    format!(
        "{} {} ({})",
        resolve_os_version(entry),
        entry.version,
        entry.build
    )
}

/// `"{os} {version}"` as shown in on-device firmware pickers.
pub fn short_firmware_label(entry: &FirmwareEntry) -> String {
    format!("{} {}", resolve_os_version(entry), entry.version)
}

pub fn jailbreak_names(catalog: &FirmwareCatalog, partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    let mut apps: Vec<&JailbreakApp> = catalog.jailbreak.iter().collect();
    apps.sort_by_cached_key(|app| app.name.to_lowercase());

    apps.into_iter()
        .filter(|app| app.name.to_lowercase().starts_with(&partial))
        .take(MAX_SUGGESTIONS)
        .map(|app| app.name.clone())
        .collect()
}

/// Newest-first releases whose version or build contains `partial`, limited
/// to either betas or stable releases.
pub fn firmware_versions(catalog: &FirmwareCatalog, partial: &str, beta: bool) -> Vec<String> {
    let partial = partial.to_lowercase();
    let mut entries: Vec<&FirmwareEntry> = catalog.ios.iter().collect();
    entries.sort_by(|left, right| right.release_date().cmp(left.release_date()));

    entries
        .into_iter()
        .filter(|entry| entry.beta == beta)
        .filter(|entry| {
            entry.version.to_lowercase().contains(&partial)
                || entry.build.to_lowercase().contains(&partial)
        })
        .take(MAX_SUGGESTIONS)
        .map(firmware_label)
        .collect()
}

/// Device names whose name or identifiers contain `partial`.
pub fn device_names(catalog: &FirmwareCatalog, partial: &str, jailbreakable_only: bool) -> Vec<String> {
    let partial = partial.to_lowercase();
    let matching = transform_groups(&catalog.groups)
        .into_iter()
        .filter(|group| group.mentions(&partial))
        .filter(|group| {
            !jailbreakable_only
                || !group
                    .kind
                    .as_deref()
                    .is_some_and(|kind| NON_JAILBREAKABLE_TYPES.contains(&kind))
        })
        .collect();

    rank_device_groups(matching)
        .into_iter()
        .map(|group| group.name)
        .collect()
}

/// Order groups by type label (untyped last), then by `order` descending
/// within each type. Whole types are appended until the limit is reached.
pub fn rank_device_groups(mut groups: Vec<DeviceGroup>) -> Vec<DeviceGroup> {
    groups.sort_by(|left, right| type_sort_key(left).cmp(&type_sort_key(right)));

    let mut ranked = Vec::with_capacity(groups.len().min(MAX_SUGGESTIONS));
    for same_type in groups.chunk_by(|left, right| left.kind == right.kind) {
        let mut same_type = same_type.to_vec();
        same_type.sort_by(|left, right| right.order.cmp(&left.order));
        ranked.extend(same_type);

        if ranked.len() >= MAX_SUGGESTIONS {
            break;
        }
    }

    ranked.truncate(MAX_SUGGESTIONS);
    ranked
}

fn type_sort_key(group: &DeviceGroup) -> (bool, Option<&str>) {
    (group.kind.is_none(), group.kind.as_deref())
}

/// First (flattened) device group whose name or any identifier equals `device`.
pub fn find_device_group(catalog: &FirmwareCatalog, device: &str) -> Option<DeviceGroup> {
    let wanted = device.trim().to_lowercase();
    transform_groups(&catalog.groups)
        .into_iter()
        .find(|group| group.is_named(&wanted))
}

/// Firmware versions available for the selected device, newest first.
pub fn firmware_versions_on_device(
    catalog: &FirmwareCatalog,
    device: &str,
    partial: &str,
) -> Vec<String> {
    let Some(group) = find_device_group(catalog, device) else {
        return Vec::new();
    };
    let Some(device_id) = group.devices.first() else {
        return Vec::new();
    };

    let partial = partial.to_lowercase();
    let mut labels: Vec<String> = catalog
        .ios
        .iter()
        .filter(|entry| entry.supports_device(device_id))
        .filter(|entry| entry.version.to_lowercase().contains(&partial))
        .map(short_firmware_label)
        .collect();

    sort_versions_descending(&mut labels);
    labels.truncate(MAX_SUGGESTIONS);
    labels
}

/// Numeric tuple of the first whitespace-separated token made only of
/// dot-separated integers; empty when the label has none.
pub fn version_sort_key(label: &str) -> Vec<u64> {
    label
        .split_whitespace()
        .find_map(|token| {
            token
                .split('.')
                .map(|part| part.parse::<u64>().ok())
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_default()
}

pub fn sort_versions_descending(labels: &mut [String]) {
    labels.sort_by_cached_key(|label| Reverse(version_sort_key(label)));
}

pub fn repository_slugs(repositories: &[Repository], partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    let mut slugs: Vec<&str> = repositories
        .iter()
        .filter_map(|repo| repo.slug.as_deref())
        .filter(|slug| !slug.is_empty())
        .collect();
    slugs.sort_unstable();

    slugs
        .into_iter()
        .filter(|slug| slug.to_lowercase().contains(&partial))
        .take(MAX_SUGGESTIONS)
        .map(str::to_owned)
        .collect()
}

pub fn find_jailbreak<'a>(catalog: &'a FirmwareCatalog, name: &str) -> Option<&'a JailbreakApp> {
    let wanted = name.trim();
    catalog
        .jailbreak
        .iter()
        .find(|app| app.name.eq_ignore_ascii_case(wanted))
}

/// Resolve a picker label, bare version or build number to a release.
pub fn find_firmware<'a>(
    catalog: &'a FirmwareCatalog,
    query: &str,
    beta: bool,
) -> Option<&'a FirmwareEntry> {
    let wanted = query.trim();
    let candidates = || catalog.ios.iter().filter(move |entry| entry.beta == beta);

    candidates()
        .find(|entry| firmware_label(entry).eq_ignore_ascii_case(wanted))
        .or_else(|| candidates().find(|entry| entry.build.eq_ignore_ascii_case(wanted)))
        .or_else(|| candidates().find(|entry| entry.version.eq_ignore_ascii_case(wanted)))
}

/// Resolve an on-device picker label (or bare version) for one device identifier.
pub fn find_firmware_on_device<'a>(
    catalog: &'a FirmwareCatalog,
    device_id: &str,
    query: &str,
) -> Option<&'a FirmwareEntry> {
    let wanted = query.trim();
    catalog
        .ios
        .iter()
        .filter(|entry| entry.supports_device(device_id))
        .find(|entry| {
            short_firmware_label(entry).eq_ignore_ascii_case(wanted)
                || entry.version.eq_ignore_ascii_case(wanted)
        })
}

pub fn find_repository<'a>(repositories: &'a [Repository], slug: &str) -> Option<&'a Repository> {
    let wanted = slug.trim();
    repositories
        .iter()
        .find(|repo| repo.slug.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(wanted)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn firmware(version: &str, build: &str, devices: &[&str]) -> FirmwareEntry {
        FirmwareEntry {
            version: version.to_owned(),
            build: build.to_owned(),
            released: None,
            beta: false,
            devices: Some(devices.iter().map(|d| (*d).to_owned()).collect()),
        }
    }

    fn group(name: &str, kind: Option<&str>, order: Option<i64>, devices: &[&str]) -> DeviceGroup {
        DeviceGroup {
            name: name.to_owned(),
            kind: kind.map(str::to_owned),
            order,
            devices: devices.iter().map(|d| (*d).to_owned()).collect(),
            subgroups: None,
        }
    }

    #[test]
    fn os_version_follows_first_device() {
        assert_eq!(resolve_os_version(&firmware("9.0", "13T5", &["AppleTV3,1"])), "tvOS");
        assert_eq!(resolve_os_version(&firmware("1.0", "13T5", &["AppleTV3,1"])), "tvOS");
        assert_eq!(resolve_os_version(&firmware("7.0", "17R5", &["Watch5,1"])), "watchOS");
        assert_eq!(resolve_os_version(&firmware("2.0", "5A347", &["iPhone2,1"])), "iPhoneOS");
        assert_eq!(resolve_os_version(&firmware("3.0", "7A341", &["iPhone2,1"])), "iOS");
        assert_eq!(resolve_os_version(&firmware("2.0", "5A347", &["iPod1,1"])), "iOS");
    }

    #[test]
    fn os_version_defaults_to_ios() {
        let mut entry = firmware("2.0", "5A347", &[]);
        assert_eq!(resolve_os_version(&entry), "iOS");

        entry.devices = None;
        assert_eq!(resolve_os_version(&entry), "iOS");

        let odd = firmware("beta.1", "X", &["iPhone1,1"]);
        assert_eq!(resolve_os_version(&odd), "iOS");
    }

    #[test]
    fn transform_groups_flattens_one_level() {
        let groups = vec![
            DeviceGroup {
                subgroups: Some(vec![
                    group("A1", None, None, &[]),
                    DeviceGroup {
                        subgroups: Some(vec![group("deep", None, None, &[])]),
                        ..group("A2", None, Some(9), &[])
                    },
                ]),
                ..group("A", None, Some(1), &[])
            },
            group("B", None, Some(2), &[]),
        ];

        let flattened = transform_groups(&groups);
        let summary: Vec<(&str, Option<i64>)> = flattened
            .iter()
            .map(|g| (g.name.as_str(), g.order))
            .collect();
        assert_eq!(summary, vec![("A1", Some(1)), ("A2", Some(1)), ("B", Some(2))]);
        assert!(flattened[1].subgroups.is_some());
    }

    #[test]
    fn jailbreaks_match_by_prefix_sorted_case_insensitively() {
        let catalog: FirmwareCatalog = serde_json::from_value(json!({
            "jailbreak": [
                { "name": "unc0ver" }, { "name": "Taurine" }, { "name": "checkra1n" },
                { "name": "Chimera" }, { "name": "Odyssey" }
            ]
        }))
        .unwrap();

        assert_eq!(jailbreak_names(&catalog, "c"), vec!["checkra1n", "Chimera"]);
        assert_eq!(jailbreak_names(&catalog, "").len(), 5);
        assert_eq!(jailbreak_names(&catalog, "")[0], "checkra1n");
        assert!(jailbreak_names(&catalog, "ver").is_empty());
    }

    #[test]
    fn firmware_versions_partition_betas_and_sort_newest_first() {
        let catalog: FirmwareCatalog = serde_json::from_value(json!({
            "ios": [
                { "version": "14.2", "build": "18B92", "released": "2020-11-05", "devices": { "iPhone12,1": {} } },
                { "version": "14.3 beta 1", "build": "18C5044b", "released": "2020-11-05", "beta": true, "devices": { "iPhone12,1": {} } },
                { "version": "14.3", "build": "18C66", "released": "2020-12-14", "devices": { "iPhone12,1": {} } },
                { "version": "1.0", "build": "1A543a", "devices": { "iPhone1,1": {} } }
            ]
        }))
        .unwrap();

        assert_eq!(
            firmware_versions(&catalog, "", false),
            vec!["iOS 14.3 (18C66)", "iOS 14.2 (18B92)", "iPhoneOS 1.0 (1A543a)"]
        );
        assert_eq!(
            firmware_versions(&catalog, "18c", true),
            vec!["iOS 14.3 beta 1 (18C5044b)"]
        );
        assert_eq!(firmware_versions(&catalog, "18b9", false), vec!["iOS 14.2 (18B92)"]);
    }

    #[test]
    fn device_listing_groups_by_type_then_order() {
        let catalog = FirmwareCatalog {
            groups: vec![
                group("Apple TV 4K", Some("TV"), Some(3), &["AppleTV6,2"]),
                group("iPhone X", Some("iPhone"), Some(10), &["iPhone10,3"]),
                group("iPhone 12", Some("iPhone"), Some(14), &["iPhone13,2"]),
                group("Mystery", None, Some(99), &["Unknown1,1"]),
                group("iPad Pro", Some("iPad"), Some(5), &["iPad8,1"]),
            ],
            ..FirmwareCatalog::default()
        };

        assert_eq!(
            device_names(&catalog, "", false),
            vec!["Apple TV 4K", "iPad Pro", "iPhone 12", "iPhone X", "Mystery"]
        );
        assert_eq!(
            device_names(&catalog, "", true),
            vec!["iPad Pro", "iPhone 12", "iPhone X", "Mystery"]
        );
        assert_eq!(device_names(&catalog, "iphone13", false), vec!["iPhone 12"]);
    }

    #[test]
    fn device_listing_stops_after_limit() {
        let mut groups: Vec<DeviceGroup> = (0..20)
            .map(|i| group(&format!("iPad {i}"), Some("iPad"), Some(i), &["iPad1,1"]))
            .collect();
        groups.extend((0..20).map(|i| group(&format!("iPhone {i}"), Some("iPhone"), Some(i), &["iPhone1,1"])));
        groups.extend((0..20).map(|i| group(&format!("iPod {i}"), Some("iPod"), Some(i), &["iPod1,1"])));
        let catalog = FirmwareCatalog {
            groups,
            ..FirmwareCatalog::default()
        };

        let names = device_names(&catalog, "", false);
        assert_eq!(names.len(), MAX_SUGGESTIONS);
        assert_eq!(names[0], "iPad 19");
        assert_eq!(names[20], "iPhone 19");
        assert!(names.iter().all(|name| !name.starts_with("iPod")));
    }

    #[test]
    fn on_device_versions_sort_numerically() {
        let catalog = FirmwareCatalog {
            ios: vec![
                firmware("14.2", "18B92", &["iPhone12,1"]),
                firmware("9.3.1", "13E238", &["iPhone12,1", "iPhone8,1"]),
                firmware("14.10", "18Z1", &["iPhone12,1"]),
                firmware("13.0", "17A577", &["iPhone11,8"]),
            ],
            groups: vec![group("iPhone 11", Some("iPhone"), Some(13), &["iPhone12,1"])],
            ..FirmwareCatalog::default()
        };

        assert_eq!(
            firmware_versions_on_device(&catalog, "iphone 11", ""),
            vec!["iOS 14.10", "iOS 14.2", "iOS 9.3.1"]
        );
        assert_eq!(
            firmware_versions_on_device(&catalog, "iPhone12,1", "14"),
            vec!["iOS 14.10", "iOS 14.2"]
        );
        assert!(firmware_versions_on_device(&catalog, "iPhone 99", "").is_empty());
    }

    #[test]
    fn version_sort_is_numeric_not_lexicographic() {
        let mut labels = vec![
            "14.2 (A)".to_owned(),
            "14.10 (B)".to_owned(),
            "9.3.1 (C)".to_owned(),
        ];
        sort_versions_descending(&mut labels);
        assert_eq!(labels, vec!["14.10 (B)", "14.2 (A)", "9.3.1 (C)"]);

        assert_eq!(version_sort_key("iOS 15.0 beta 2"), vec![15, 0]);
        assert!(version_sort_key("no numbers").is_empty());
    }

    #[test]
    fn repository_slugs_skip_missing_and_filter() {
        let repos: Vec<Repository> = serde_json::from_value(json!([
            { "slug": "havoc" }, { "slug": null }, { "slug": "" }, { "slug": "Chariz" }, { "name": "no slug" }
        ]))
        .unwrap();

        assert_eq!(repository_slugs(&repos, ""), vec!["Chariz", "havoc"]);
        assert_eq!(repository_slugs(&repos, "CHA"), vec!["Chariz"]);
        assert_eq!(find_repository(&repos, "chariz").and_then(|r| r.slug.as_deref()), Some("Chariz"));
    }

    #[test]
    fn every_query_caps_results() {
        let catalog = FirmwareCatalog {
            ios: (0..40)
                .map(|i| firmware(&format!("14.{i}"), &format!("18A{i}"), &["iPhone12,1"]))
                .collect(),
            groups: vec![group("iPhone 11", Some("iPhone"), Some(1), &["iPhone12,1"])],
            jailbreak: (0..40)
                .map(|i| JailbreakApp {
                    name: format!("jb{i}"),
                    info: None,
                })
                .collect(),
        };

        assert_eq!(firmware_versions(&catalog, "", false).len(), MAX_SUGGESTIONS);
        assert_eq!(firmware_versions_on_device(&catalog, "iPhone 11", "").len(), MAX_SUGGESTIONS);
        assert_eq!(jailbreak_names(&catalog, "jb").len(), MAX_SUGGESTIONS);
        assert_eq!(firmware_versions_on_device(&catalog, "iPhone 11", "")[0], "iOS 14.39");
    }

    #[test]
    fn lookups_accept_labels_versions_and_builds() {
        let catalog = FirmwareCatalog {
            ios: vec![firmware("14.2", "18B92", &["iPhone12,1"])],
            ..FirmwareCatalog::default()
        };

        assert!(find_firmware(&catalog, "iOS 14.2 (18B92)", false).is_some());
        assert!(find_firmware(&catalog, "18b92", false).is_some());
        assert!(find_firmware(&catalog, "14.2", true).is_none());
        assert!(find_firmware_on_device(&catalog, "iPhone12,1", "iOS 14.2").is_some());
        assert!(find_firmware_on_device(&catalog, "iPhone8,1", "14.2").is_none());
    }
}
