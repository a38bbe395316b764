use std::time::Duration;

use super::{Lookup, Notice, ReleaseRecord};
use crate::fetch::{musicbrainz::Release, ReleaseSource};

#[derive(Debug, Clone)]
pub struct Options {
    pub page_size: u32,
    pub delay: Duration,
    /// Base of the links to catalog entries, e.g. `https://musicbrainz.org/`
    pub site_url: url::Url,
}

impl From<&base::setting::MusicBrainz> for Options {
    fn from(settings: &base::setting::MusicBrainz) -> Self {
        Self {
            page_size: settings.page_size,
            delay: settings.request_delay(),
            site_url: settings.site_url.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Aggregate {
    pub records: Vec<ReleaseRecord>,
    /// The failure that stopped the search early, if any
    pub error: Option<Notice>,
}

pub fn extract(year: i32, release: Release, site_url: &url::Url) -> ReleaseRecord {
    let artist = release.first_artist().map(str::to_string);
    let url = release
        .mbid()
        .map(|id| format!("{}release/{}", site_url, id));
    ReleaseRecord {
        year,
        title: release.title,
        artist,
        date: release.date,
        url,
    }
}

fn sort_key(record: &ReleaseRecord) -> (i32, &str, &str) {
    (
        record.year,
        record.artist.as_deref().unwrap_or_default(),
        record.title.as_deref().unwrap_or_default(),
    )
}

/// Stable sort by year, then artist, then title. Missing values sort as empty
/// strings.
pub fn sort_records(records: &mut [ReleaseRecord]) {
    records.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

/// Searches every year of the lookup in order, stopping at the first failure.
/// Records gathered before the failure are kept.
pub async fn aggregate<S>(catalog: &S, lookup: &Lookup, opts: &Options) -> Aggregate
where
    S: ReleaseSource + ?Sized,
{
    tracing::info! {
        month_day = %lookup.month_day,
        start = lookup.start_year,
        end = lookup.end_year,
        "Searching releases across years"
    };
    let mut records = Vec::new();
    let mut error = None;
    for year in lookup.start_year..=lookup.end_year {
        if year != lookup.start_year && !opts.delay.is_zero() {
            tokio::time::sleep(opts.delay).await;
        }
        let date = format!("{}-{}", year, lookup.month_day);
        match catalog.search_by_date(date.as_str(), opts.page_size).await {
            Ok(releases) => {
                tracing::debug! {%date, count = releases.len(), "Fetched releases"};
                records.extend(
                    releases
                        .into_iter()
                        .map(|release| extract(year, release, &opts.site_url)),
                );
            }
            Err(source) => {
                tracing::warn! {%date, %source, "Release search failed, stopping"};
                error = Some(Notice::Fetch { year, source });
                break;
            }
        }
    }
    sort_records(&mut records);
    tracing::info! {count = records.len(), failed = error.is_some(), "Finished release search"};
    Aggregate { records, error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers searches from a per-year script and records every query.
    #[derive(Default)]
    struct Scripted {
        answers: HashMap<i32, Vec<Release>>,
        failing: Option<i32>,
        queries: Mutex<Vec<(String, u32)>>,
    }

    impl Scripted {
        fn with(mut self, year: i32, releases: Vec<Release>) -> Self {
            self.answers.insert(year, releases);
            self
        }

        fn failing_at(mut self, year: i32) -> Self {
            self.failing = Some(year);
            self
        }

        fn queries(&self) -> Vec<(String, u32)> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReleaseSource for Scripted {
        async fn search_by_date(&self, date: &str, limit: u32) -> Result<Vec<Release>, FetchError> {
            self.queries.lock().unwrap().push((date.to_string(), limit));
            let year: i32 = date[..date.len() - 6].parse().unwrap();
            if self.failing == Some(year) {
                return Err(FetchError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    url: url::Url::parse("https://musicbrainz.org/ws/2/release/").unwrap(),
                });
            }
            Ok(self.answers.get(&year).cloned().unwrap_or_default())
        }
    }

    fn release(id: Option<&str>, title: Option<&str>, artist: Option<&str>) -> Release {
        let mut value = json!({ "id": id, "title": title, "date": "2019" });
        if let Some(artist) = artist {
            value["artist-credit"] = json!([{ "name": artist }]);
        }
        serde_json::from_value(value).unwrap()
    }

    fn options() -> Options {
        Options {
            page_size: 50,
            delay: Duration::ZERO,
            site_url: url::Url::parse("https://musicbrainz.org/").unwrap(),
        }
    }

    fn lookup(start_year: i32, end_year: i32) -> Lookup {
        Lookup {
            month_day: "11-22".to_string(),
            start_year,
            end_year,
        }
    }

    fn summary(records: &[ReleaseRecord]) -> Vec<(i32, Option<&str>, Option<&str>)> {
        records
            .iter()
            .map(|r| (r.year, r.artist.as_deref(), r.title.as_deref()))
            .collect()
    }

    #[tokio::test]
    async fn queries_every_year_in_order() {
        let source = Scripted::default();
        let result = aggregate(&source, &lookup(2018, 2020), &options()).await;
        assert!(result.records.is_empty());
        assert!(result.error.is_none());
        assert_eq!(
            source.queries(),
            vec![
                ("2018-11-22".to_string(), 50),
                ("2019-11-22".to_string(), 50),
                ("2020-11-22".to_string(), 50),
            ]
        );
    }

    #[tokio::test]
    async fn results_are_sorted_by_year_artist_title() {
        let source = Scripted::default()
            .with(2018, vec![release(Some("a"), Some("Kid A"), Some("Radiohead"))])
            .with(
                2019,
                vec![
                    release(Some("b"), Some("Zebra"), Some("Radiohead")),
                    release(Some("c"), Some("25"), Some("Adele")),
                    release(None, Some("Anonymous"), None),
                ],
            )
            .with(2020, vec![release(Some("d"), Some("Amnesiac"), Some("Radiohead"))]);
        let result = aggregate(&source, &lookup(2018, 2020), &options()).await;
        assert!(result.error.is_none());
        assert_eq!(
            summary(&result.records),
            vec![
                (2018, Some("Radiohead"), Some("Kid A")),
                (2019, None, Some("Anonymous")),
                (2019, Some("Adele"), Some("25")),
                (2019, Some("Radiohead"), Some("Zebra")),
                (2020, Some("Radiohead"), Some("Amnesiac")),
            ]
        );
    }

    #[tokio::test]
    async fn failure_keeps_earlier_years() {
        let source = Scripted::default()
            .with(2018, vec![release(Some("a"), Some("One"), Some("Adele"))])
            .with(2019, vec![release(Some("b"), Some("Two"), Some("Radiohead"))])
            .with(2021, vec![release(Some("c"), Some("Never"), Some("Nobody"))])
            .failing_at(2020);
        let result = aggregate(&source, &lookup(2018, 2021), &options()).await;
        assert_eq!(
            summary(&result.records),
            vec![
                (2018, Some("Adele"), Some("One")),
                (2019, Some("Radiohead"), Some("Two")),
            ]
        );
        match result.error {
            Some(Notice::Fetch { year, ref source }) => {
                assert_eq!(year, 2020);
                assert!(source.is_status());
            }
            ref other => panic!("unexpected error: {other:?}"),
        }
        assert!(result
            .error
            .unwrap()
            .to_string()
            .starts_with("HTTP error for year 2020: 502 Bad Gateway"));
        // no request after the failing year
        assert_eq!(source.queries().len(), 3);
    }

    #[tokio::test]
    async fn odd_records_do_not_stop_the_search() {
        let page = crate::fetch::musicbrainz::decode(
            &json!({
                "releases": [
                    { "id": "a", "title": "Good", "date": "2019-11-22",
                      "artist-credit": [{ "name": "Adele" }] },
                    { "id": "b", "title": 1999 }
                ]
            })
            .to_string(),
        )
        .unwrap();
        let source = Scripted::default().with(2019, page.releases);
        let result = aggregate(&source, &lookup(2018, 2021), &options()).await;
        assert!(result.error.is_none());
        assert_eq!(
            summary(&result.records),
            vec![(2019, None, None), (2019, Some("Adele"), Some("Good"))]
        );
        assert_eq!(source.queries().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_years_only() {
        let opts = Options {
            delay: Duration::from_millis(100),
            ..options()
        };
        let source = Scripted::default();
        let started = tokio::time::Instant::now();
        aggregate(&source, &lookup(2018, 2021), &opts).await;
        let elapsed = started.elapsed();
        // three pauses for four years, none after the last one
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(400), "{elapsed:?}");
        assert_eq!(source.queries().len(), 4);

        let started = tokio::time::Instant::now();
        aggregate(&source, &lookup(2020, 2020), &opts).await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn failure_skips_the_remaining_pauses() {
        let opts = Options {
            delay: Duration::from_millis(100),
            ..options()
        };
        let source = Scripted::default().failing_at(2019);
        let started = tokio::time::Instant::now();
        let result = aggregate(&source, &lookup(2018, 2025), &opts).await;
        assert!(result.error.is_some());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(200), "{elapsed:?}");
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let source = Scripted::default()
            .with(2018, vec![
                release(Some("b"), Some("B"), Some("Same")),
                release(Some("a"), Some("A"), Some("Same")),
            ])
            .with(2019, vec![release(Some("c"), None, None)]);
        let first = aggregate(&source, &lookup(2018, 2019), &options()).await;
        let second = aggregate(&source, &lookup(2018, 2019), &options()).await;
        assert_eq!(first.records, second.records);
    }

    #[tokio::test]
    async fn empty_range_does_nothing() {
        let source = Scripted::default();
        let result = aggregate(&source, &lookup(2027, 2026), &options()).await;
        assert!(result.records.is_empty());
        assert!(source.queries().is_empty());
    }

    #[test]
    fn extraction_builds_links_from_identifiers() {
        let site = url::Url::parse("https://musicbrainz.org/").unwrap();
        let record = extract(
            2019,
            release(Some("b84ee12a"), Some("OK"), Some("Radiohead")),
            &site,
        );
        assert_eq!(
            record,
            ReleaseRecord {
                year: 2019,
                title: Some("OK".to_string()),
                artist: Some("Radiohead".to_string()),
                date: Some("2019".to_string()),
                url: Some("https://musicbrainz.org/release/b84ee12a".to_string()),
            }
        );
        let record = extract(2001, release(None, None, None), &site);
        assert_eq!(record.year, 2001);
        assert_eq!(record.url, None);
        assert_eq!(record.artist, None);
        assert_eq!(record.title, None);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let record = |url: &str| ReleaseRecord {
            year: 2000,
            title: Some("Same".to_string()),
            artist: Some("Same".to_string()),
            date: None,
            url: Some(url.to_string()),
        };
        let mut records = vec![record("first"), record("second"), record("third")];
        sort_records(&mut records);
        let urls: Vec<_> = records.iter().map(|r| r.url.as_deref().unwrap()).collect();
        assert_eq!(urls, vec!["first", "second", "third"]);
    }
}
