//! In-memory snapshot of everything a [Store] holds.

use std::cmp::Ordering;

use crate::{
    error::PersistenceError,
    store::Store,
    types::{author::Author, series::Series, status::SeriesFilter},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub authors: Vec<Author>,
    pub series:  Vec<Series>,
}

impl Library {
    pub async fn load<S: Store>(store: &mut S) -> Result<Self, PersistenceError> {
        Ok(Self {
            authors: store.authors().await?,
            series:  store.series().await?,
        })
    }

    pub fn book_count(&self) -> usize {
        self.series.iter().map(|x| x.books.len()).sum()
    }

    /// Series with exactly this name, first one wins.
    pub fn find_series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|x| x.name == name)
    }

    pub fn filtered(&self, filter: SeriesFilter) -> Vec<&Series> {
        self.series.iter().filter(|x| filter.matches(x.status)).collect()
    }

    pub fn sort_by_name(&mut self) {
        self.series.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Oldest last read first. Series nobody finished a book of go to the end.
    pub fn sort_by_last_read(&mut self) {
        sort_by_last_read(&mut self.series);
    }
}

pub fn sort_by_last_read(series: &mut [Series]) {
    series.sort_by(|a, b| match (a.anchor_date(), b.anchor_date()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        book::Book,
        status::{ReadStatus, SeriesStatus},
        timestamp::Timestamp,
    };
    use pretty_assertions::assert_eq;

    fn series(name: &str, finished_on: Option<u32>) -> Series {
        let mut series = Series::new(name, Author::new("Martha Wells"), SeriesStatus::InProgress).unwrap();
        if let Some(day) = finished_on {
            let mut book = Book::new(series.id, "Book 1", 1, ReadStatus::Completed).unwrap();
            book.end_date = Timestamp::from_ymd(2024, 3, day);
            series.books.push(book);
        }
        series
    }

    #[test]
    fn last_read_order_puts_unread_last() {
        let mut library = Library {
            authors: vec![],
            series:  vec![series("Unread", None), series("Recent", Some(20)), series("Old", Some(2))],
        };
        library.sort_by_last_read();
        let names: Vec<_> = library.series.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, ["Old", "Recent", "Unread"]);
    }

    #[test]
    fn filtering() {
        let mut reading = series("Murderbot", None);
        reading.status = SeriesStatus::Reading;
        let library = Library {
            authors: vec![],
            series:  vec![series("Raksura", None), reading],
        };
        assert_eq!(library.filtered(SeriesFilter::Everything).len(), 2);
        let only = library.filtered(SeriesFilter::Only(SeriesStatus::Reading));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name, "Murderbot");
        assert!(library.find_series("Raksura").is_some());
        assert!(library.find_series("raksura").is_none());
    }
}
