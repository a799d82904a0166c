//! What to read now and what to read next.

use std::fmt::Display;

use tracing::{debug, warn};

use crate::types::{
    book::Book,
    series::Series,
    status::{ReadStatus, SeriesStatus},
    timestamp::UnsetLast,
};

pub const NO_SERIES_IN_PROGRESS: &str = "No Series in Progress";
pub const NO_BOOK_IN_PROGRESS: &str = "None";
pub const AMBIGUOUS_BOOK_IN_PROGRESS: &str = "Several books in progress";

/// The book being read in the first series with status [SeriesStatus::Reading].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentlyReading<'a> {
    NoSeries,
    NoBook,
    Book(&'a Book),
    /// More than one book of the series is in progress.
    Ambiguous,
}

impl Display for CurrentlyReading<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrentlyReading::NoSeries => write!(f, "{NO_SERIES_IN_PROGRESS}"),
            CurrentlyReading::NoBook => write!(f, "{NO_BOOK_IN_PROGRESS}"),
            CurrentlyReading::Book(book) => write!(f, "{}", book.title),
            CurrentlyReading::Ambiguous => write!(f, "{AMBIGUOUS_BOOK_IN_PROGRESS}"),
        }
    }
}

pub fn currently_reading(series: &[Series]) -> CurrentlyReading<'_> {
    let mut reading = series.iter().filter(|x| x.status == SeriesStatus::Reading);
    let Some(first) = reading.next() else {
        return CurrentlyReading::NoSeries;
    };
    let others = reading.count();
    if others > 0 {
        warn!("{} series are marked as reading, using '{}'.", others + 1, first.name);
    }

    let mut in_progress = first.books_with_status(ReadStatus::InProgress);
    match (in_progress.next(), in_progress.next()) {
        (None, _) => CurrentlyReading::NoBook,
        (Some(book), None) => CurrentlyReading::Book(book),
        (Some(_), Some(_)) => CurrentlyReading::Ambiguous,
    }
}

/// Next unstarted book of the in-progress series that was neglected longest.
///
/// Only series with at least one completed book compete; they are ranked by their latest
/// completion, oldest first. Within the winner the unstarted book with the earliest end date
/// wins, falling back to series order and then position.
pub fn suggested_next_read(series: &[Series]) -> Option<&Book> {
    let best = series
        .iter()
        .filter(|x| x.status == SeriesStatus::InProgress)
        .filter(|x| x.books_with_status(ReadStatus::NotStarted).next().is_some())
        .filter_map(|x| x.anchor_date().map(|anchor| (anchor, x)))
        .min_by_key(|(anchor, _)| *anchor)
        .map(|(_, x)| x)?;
    debug!("Series neglected longest is '{}'.", best.name);

    best.books_with_status(ReadStatus::NotStarted)
        .min_by_key(|x| (UnsetLast(x.end_date), x.series_order))
}

/// Title of [suggested_next_read], empty if there is nothing to suggest.
pub fn suggested_next_title(series: &[Series]) -> String {
    suggested_next_read(series)
        .map(|x| x.title.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{author::Author, timestamp::Timestamp};
    use pretty_assertions::assert_eq;

    fn book(series: &Series, title: &str, order: i64, status: ReadStatus) -> Book {
        Book::new(series.id, title, order, status).unwrap()
    }

    fn in_progress_series(name: &str, finished_on: Option<u32>, unread: &[&str]) -> Series {
        let mut series = Series::new(name, Author::new("Someone"), SeriesStatus::InProgress).unwrap();
        if let Some(day) = finished_on {
            let mut done = book(&series, &format!("{name} 1"), 1, ReadStatus::Completed);
            done.end_date = Timestamp::from_ymd(2024, 1, day);
            series.books.push(done);
        }
        for (i, title) in unread.iter().enumerate() {
            let next = book(&series, title, i as i64 + 2, ReadStatus::NotStarted);
            series.books.push(next);
        }
        series
    }

    fn reading_series(in_progress: &[&str]) -> Series {
        let mut series = Series::new("Imperial Radch", Author::new("Ann Leckie"), SeriesStatus::Reading).unwrap();
        for (i, title) in in_progress.iter().enumerate() {
            let b = book(&series, title, i as i64 + 1, ReadStatus::InProgress);
            series.books.push(b);
        }
        series
    }

    #[test]
    fn oldest_anchor_wins() {
        let library = vec![
            in_progress_series("A", Some(10), &["A 2"]),
            in_progress_series("B", Some(5), &["B 2"]),
        ];
        assert_eq!(suggested_next_title(&library), "B 2");
    }

    #[test]
    fn nothing_to_suggest() {
        assert_eq!(suggested_next_title(&[]), "");

        let never_finished = in_progress_series("Fresh", None, &["Fresh 1"]);
        let mut not_in_progress = in_progress_series("Done", Some(3), &["Done 2"]);
        not_in_progress.status = SeriesStatus::Completed;
        let nothing_left = in_progress_series("Caught up", Some(3), &[]);
        assert_eq!(
            suggested_next_read(&[never_finished, not_in_progress, nothing_left]),
            None
        );
    }

    #[test]
    fn unset_completion_counts_as_most_recent() {
        let mut undated = in_progress_series("Undated", Some(1), &["Undated 2"]);
        undated.books[0].end_date = None;
        let dated = in_progress_series("Dated", Some(20), &["Dated 2"]);
        assert_eq!(suggested_next_title(&[undated, dated]), "Dated 2");
    }

    #[test]
    fn lowest_series_order_breaks_ties() {
        let mut series = in_progress_series("Culture", Some(1), &[]);
        for (title, order) in [("Excession", 5), ("Use of Weapons", 3), ("Look to Windward", 7)] {
            let b = book(&series, title, order, ReadStatus::NotStarted);
            series.books.push(b);
        }
        assert_eq!(suggested_next_title(&[series]), "Use of Weapons");
    }

    #[test]
    fn current_book() {
        assert_eq!(currently_reading(&[]), CurrentlyReading::NoSeries);
        assert_eq!(currently_reading(&[]).to_string(), NO_SERIES_IN_PROGRESS);

        let none = [reading_series(&[])];
        assert_eq!(currently_reading(&none).to_string(), NO_BOOK_IN_PROGRESS);

        let one = [reading_series(&["Ancillary Sword"])];
        assert_eq!(currently_reading(&one).to_string(), "Ancillary Sword");

        let two = [reading_series(&["Ancillary Sword", "Ancillary Mercy"])];
        assert_eq!(currently_reading(&two), CurrentlyReading::Ambiguous);
        assert_eq!(currently_reading(&two).to_string(), AMBIGUOUS_BOOK_IN_PROGRESS);
    }

    #[test]
    fn first_reading_series_is_used() {
        let library = [
            in_progress_series("Not reading", Some(1), &[]),
            reading_series(&["Ancillary Justice"]),
            reading_series(&[]),
        ];
        assert_eq!(currently_reading(&library).to_string(), "Ancillary Justice");
    }
}
