//! Parsing of the SIS directory index page.
//!
//! The share serves a plain Apache-style index; every measurement file shows
//! up as an anchor whose href encodes its validity time
//! (`SISin<YYYYMMDDHHMM>DEv3.nc`). Entries that do not match that shape are
//! not measurement files and are skipped.

use chrono::{DateTime, Duration, TimeZone, Utc};
use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static LISTING_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    // pattern is a checked literal
    Regex::new(r#"href="(SISin(\d{4})(\d{2})(\d{2})(\d{2})(\d{2})DEv3\.nc)""#).unwrap()
});

/// One measurement file offered by the directory index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// File name as listed, e.g. `SISin202405271345DEv3.nc`.
    pub name: String,
    /// UTC validity time embedded in the name.
    pub timestamp: DateTime<Utc>,
}

/// Extracts the measurement files from the index page `html`, keeping only
/// files at most `max_age_hours` older than `now`, newest first.
///
/// Entries whose embedded date does not exist are skipped with a debug log.
pub fn parse_listing(html: &str, now: DateTime<Utc>, max_age_hours: f64) -> Vec<RemoteFile> {
    let max_age = Duration::seconds((max_age_hours * 3600.0) as i64);
    let mut files: Vec<RemoteFile> = LISTING_ENTRY
        .captures_iter(html)
        .filter_map(|captures| {
            let Some(file) = file_at(&captures) else {
                debug!("skipping listing entry with invalid date: {}", &captures[0]);
                return None;
            };
            if now - file.timestamp > max_age {
                return None;
            }
            Some(file)
        })
        .collect();
    files.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    files
}

fn file_at(captures: &Captures) -> Option<RemoteFile> {
    let name = captures.get(1)?.as_str().to_string();
    let year: i32 = captures.get(2)?.as_str().parse().ok()?;
    let month: u32 = captures.get(3)?.as_str().parse().ok()?;
    let day: u32 = captures.get(4)?.as_str().parse().ok()?;
    let hour: u32 = captures.get(5)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(6)?.as_str().parse().ok()?;
    let timestamp = Utc
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()?;
    Some(RemoteFile { name, timestamp })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_page(names: &[&str]) -> String {
        let mut html = String::from("<html><body><pre><a href=\"../\">../</a>\n");
        for name in names {
            html.push_str(&format!(
                "<a href=\"{name}\">{name}</a>  27-May-2024 14:02  3M\n"
            ));
        }
        html.push_str("</pre></body></html>");
        html
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 27, 14, 10, 0).unwrap()
    }

    #[test]
    fn files_come_back_newest_first() {
        let html = index_page(&[
            "SISin202405271300DEv3.nc",
            "SISin202405271345DEv3.nc",
            "SISin202405271315DEv3.nc",
        ]);
        let files = parse_listing(&html, now(), 3.0);

        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "SISin202405271345DEv3.nc",
                "SISin202405271315DEv3.nc",
                "SISin202405271300DEv3.nc",
            ]
        );
        assert_eq!(
            files[0].timestamp,
            Utc.with_ymd_and_hms(2024, 5, 27, 13, 45, 0).unwrap()
        );
    }

    #[test]
    fn foreign_entries_are_ignored() {
        let html = index_page(&[
            "SISin202405271345DEv3.nc",
            "SISfc2024052713_fc%2B18h-DE.nc",
            "SISin20240527DEv3.nc",
            "readme.txt",
        ]);
        let files = parse_listing(&html, now(), 3.0);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "SISin202405271345DEv3.nc");
    }

    #[test]
    fn impossible_dates_are_skipped() {
        let html = index_page(&["SISin202413991399DEv3.nc", "SISin202405271345DEv3.nc"]);
        let files = parse_listing(&html, now(), 3.0);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn age_window_filters_old_files() {
        let html = index_page(&[
            "SISin202405271345DEv3.nc",
            "SISin202405270945DEv3.nc",
            "SISin202405261345DEv3.nc",
        ]);
        let files = parse_listing(&html, now(), 3.0);
        assert_eq!(files.len(), 1);

        let wider = parse_listing(&html, now(), 5.0);
        assert_eq!(wider.len(), 2);
    }

    #[test]
    fn future_stamped_files_pass_the_age_window() {
        let html = index_page(&["SISin202405271500DEv3.nc"]);
        let files = parse_listing(&html, now(), 3.0);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn empty_page_yields_no_files() {
        assert!(parse_listing(&index_page(&[]), now(), 3.0).is_empty());
    }
}
