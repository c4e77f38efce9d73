//! Pattern and date filtering over entries.
//!
//! Patterns are loose wildcards over regex: every `*` becomes `.*` and the
//! rest is handed to the regex engine untouched, case-insensitive and
//! unanchored. `a.b` therefore also matches `axb`.

use chrono::{Local, NaiveDate};
use regex::{Regex, RegexBuilder};

use crate::entry::Entry;
use crate::error::Result;

pub const MATCH_ALL: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub pattern: String,
    pub day: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            pattern: MATCH_ALL.to_string(),
            day: None,
            limit: None,
        }
    }
}

impl Query {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    pub fn on_day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    let source = pattern.replace('*', ".*");
    Ok(RegexBuilder::new(&source).case_insensitive(true).build()?)
}

/// Returns the entries matching `query`, in input order.
pub fn search<'a, I>(entries: I, query: &Query) -> Result<Vec<&'a Entry>>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let regex = compile_pattern(&query.pattern)?;
    let matches = entries
        .into_iter()
        .filter(|e| matches_text(e, &regex))
        .filter(|e| query.day.is_none_or(|day| local_day(e) == day))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    Ok(matches)
}

fn matches_text(entry: &Entry, regex: &Regex) -> bool {
    regex.is_match(&entry.content) || entry.tags.iter().any(|t| regex.is_match(t))
}

fn local_day(entry: &Entry) -> NaiveDate {
    entry.timestamp.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{ENCRYPTED_PLACEHOLDER, EntryStore};
    use crate::error::MemoryError;
    use chrono::{Duration, TimeZone, Utc};

    fn store() -> EntryStore {
        let mut store = EntryStore::new();
        store.add("React hook".into(), vec!["frontend".into()], false);
        store.add("React useEffect".into(), vec![], false);
        store.add("JavaScript closures".into(), vec!["js".into()], false);
        store.add(ENCRYPTED_PLACEHOLDER.into(), vec!["aws".into()], true);
        store
    }

    fn ids(found: &[&Entry]) -> Vec<u64> {
        found.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_match_all_keeps_order() {
        let store = store();
        let found = search(store.iter(), &Query::default()).unwrap();
        assert_eq!(ids(&found), vec![100, 101, 102, 103]);
    }

    #[test]
    fn test_literal_is_case_insensitive_substring() {
        let store = store();
        let found = search(store.iter(), &Query::new("react")).unwrap();
        assert_eq!(ids(&found), vec![100, 101]);
    }

    #[test]
    fn test_wildcard() {
        let store = store();
        let found = search(store.iter(), &Query::new("Rea*")).unwrap();
        assert_eq!(ids(&found), vec![100, 101]);

        let found = search(store.iter(), &Query::new("java*clo")).unwrap();
        assert_eq!(ids(&found), vec![102]);
    }

    #[test]
    fn test_matches_tags() {
        let store = store();
        assert_eq!(ids(&search(store.iter(), &Query::new("FRONT")).unwrap()), vec![100]);
        assert_eq!(ids(&search(store.iter(), &Query::new("aws")).unwrap()), vec![103]);
    }

    #[test]
    fn test_encrypted_content_is_not_searched() {
        let mut store = EntryStore::new();
        store.add(ENCRYPTED_PLACEHOLDER.into(), vec![], true);

        assert!(search(store.iter(), &Query::new("password")).unwrap().is_empty());
        assert_eq!(search(store.iter(), &Query::new("encrypted")).unwrap().len(), 1);
    }

    #[test]
    fn test_regex_metacharacters_stay_live() {
        let mut store = EntryStore::new();
        store.add("a.b".into(), vec![], false);
        store.add("axb".into(), vec![], false);
        store.add("ab".into(), vec![], false);

        let found = search(store.iter(), &Query::new("a.b")).unwrap();
        assert_eq!(ids(&found), vec![100, 101]);

        let found = search(store.iter(), &Query::new("^ab$")).unwrap();
        assert_eq!(ids(&found), vec![102]);
    }

    #[test]
    fn test_invalid_regex() {
        let store = store();
        assert!(matches!(
            search(store.iter(), &Query::new("(unclosed")),
            Err(MemoryError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_no_match_is_empty() {
        let store = store();
        assert!(search(store.iter(), &Query::new("python")).unwrap().is_empty());
    }

    #[test]
    fn test_date_filter_exact_day() {
        let noon = Local.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        let mut store = EntryStore::new();
        store.add_at("on the day".into(), vec![], false, noon.with_timezone(&Utc));
        store.add_at(
            "day before".into(),
            vec![],
            false,
            (noon - Duration::days(1)).with_timezone(&Utc),
        );
        store.add_at(
            "day after".into(),
            vec![],
            false,
            (noon + Duration::days(1)).with_timezone(&Utc),
        );

        let day = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let found = search(store.iter(), &Query::default().on_day(day)).unwrap();
        assert_eq!(ids(&found), vec![100]);

        let found = search(store.iter(), &Query::new("after").on_day(day)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_today_filter() {
        let mut store = EntryStore::new();
        store.add("fresh".into(), vec![], false);
        store.add_at(
            "old".into(),
            vec![],
            false,
            Utc::now() - Duration::days(3),
        );

        let today = Local::now().date_naive();
        let found = search(store.iter(), &Query::default().on_day(today)).unwrap();
        assert_eq!(ids(&found), vec![100]);
    }

    #[test]
    fn test_limit() {
        let store = store();
        let found = search(store.iter(), &Query::default().with_limit(2)).unwrap();
        assert_eq!(ids(&found), vec![100, 101]);
    }
}
