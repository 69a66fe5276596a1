/// Discord rejects autocomplete responses with more choices than this.
pub const MAX_SUGGESTIONS: usize = 25;

/// Lowercased names, sorted ascending, that contain `partial` (case-insensitive).
pub fn substring_suggestions<I, S>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let partial = partial.to_lowercase();
    let mut names: Vec<String> = names
        .into_iter()
        .map(|name| name.as_ref().to_lowercase())
        .collect();
    names.sort_unstable();

    names
        .into_iter()
        .filter(|name| name.contains(&partial))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Names sorted ascending that start with `partial` exactly as typed.
pub fn prefix_suggestions<I, S>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: Vec<String> = names
        .into_iter()
        .map(|name| name.as_ref().to_owned())
        .collect();
    names.sort_unstable();

    names
        .into_iter()
        .filter(|name| name.starts_with(partial))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Case ids, newest (highest) first, whose decimal form starts with `partial`.
pub fn case_id_suggestions<I>(ids: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = u64>,
{
    let mut ids: Vec<u64> = ids.into_iter().collect();
    ids.sort_unstable_by(|left, right| right.cmp(left));

    ids.into_iter()
        .map(|id| id.to_string())
        .filter(|id| id.starts_with(partial.trim()))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Titles sorted case-insensitively that contain `partial` (case-insensitive),
/// keeping their original casing.
pub fn title_suggestions<I, S>(titles: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let partial = partial.to_lowercase();
    let mut titles: Vec<String> = titles
        .into_iter()
        .map(|title| title.as_ref().to_owned())
        .collect();
    titles.sort_by_cached_key(|title| title.to_lowercase());

    titles
        .into_iter()
        .filter(|title| title.to_lowercase().contains(&partial))
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        MAX_SUGGESTIONS, case_id_suggestions, prefix_suggestions, substring_suggestions,
        title_suggestions,
    };

    #[test]
    fn tag_names_are_lowercased_and_sorted() {
        let tags = ["Jailbreak", "downgrade", "AppStore", "ota"];
        assert_eq!(
            substring_suggestions(tags, "a"),
            vec!["appstore", "downgrade", "jailbreak", "ota"]
        );
        assert_eq!(substring_suggestions(tags, "BREAK"), vec!["jailbreak"]);
    }

    #[test]
    fn filter_words_match_prefix_as_typed() {
        let words = ["piracy", "pirate", "Pirated", "appvalley"];
        assert_eq!(prefix_suggestions(words, "pira"), vec!["piracy", "pirate"]);
        assert_eq!(prefix_suggestions(words, "").len(), 4);
    }

    #[test]
    fn case_ids_are_newest_first() {
        assert_eq!(case_id_suggestions([3, 12, 1, 120], "1"), vec!["120", "12", "1"]);
        assert_eq!(case_id_suggestions([3, 12], ""), vec!["12", "3"]);
    }

    #[test]
    fn titles_keep_casing() {
        let titles = ["crash on launch", "Bootloop after update", "App crashes"];
        assert_eq!(
            title_suggestions(titles, "CRASH"),
            vec!["App crashes", "crash on launch"]
        );
    }

    #[test]
    fn suggestions_are_capped() {
        let many: Vec<String> = (0..100).map(|i| format!("tag{i}")).collect();
        assert_eq!(substring_suggestions(&many, "tag").len(), MAX_SUGGESTIONS);
        assert_eq!(prefix_suggestions(&many, "tag").len(), MAX_SUGGESTIONS);
        assert_eq!(case_id_suggestions(0..100, "").len(), MAX_SUGGESTIONS);
        assert_eq!(title_suggestions(&many, "").len(), MAX_SUGGESTIONS);
    }
}
