use std::io::Write;

use serde::Serialize;

use crate::types::{series::Series, status::ReadStatus, timestamp::Timestamp};

const GOODREADS_DATE: &str = "%Y/%m/%d";

/// A row of a Goodreads library import file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    #[serde(rename = "Title")]
    title:           String,
    #[serde(rename = "Author")]
    author:          String,
    #[serde(rename = "My Rating")]
    my_rating:       Option<u8>,
    #[serde(rename = "Date Read")]
    date_read:       Option<String>,
    #[serde(rename = "Date Added")]
    date_added:      Option<String>,
    #[serde(rename = "Exclusive Shelf")]
    exclusive_shelf: String,
    #[serde(rename = "Private Notes")]
    private_notes:   String,
}

fn goodreads_date(ts: Option<Timestamp>) -> Option<String> {
    ts.map(|x| x.0.format(GOODREADS_DATE).to_string())
}

impl Export {
    /// One row per completed book. Books without an author of their own are credited to the
    /// series author.
    pub fn new(series: &[Series]) -> Vec<Self> {
        series
            .iter()
            .flat_map(|s| {
                s.books_with_status(ReadStatus::Completed).map(move |book| Self {
                    title:           book.title.clone(),
                    author:          book.author_name().unwrap_or(&s.author.name).to_string(),
                    my_rating:       book.rating.map(|x| x.value()),
                    date_read:       goodreads_date(book.end_date),
                    date_added:      goodreads_date(book.start_date),
                    exclusive_shelf: "read".into(),
                    private_notes:   book.notes.clone(),
                })
            })
            .collect()
    }

    pub fn export(data: &[Self], writer: impl Write) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in data {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{author::Author, book::Book, rating::Rating, status::SeriesStatus};
    use pretty_assertions::assert_eq;

    #[test]
    fn completed_books_only() {
        let mut series = Series::new("Laundry Files", Author::new("Charles Stross"), SeriesStatus::InProgress).unwrap();
        let mut done = Book::new(series.id, "The Atrocity Archives", 1, ReadStatus::Completed).unwrap();
        done.start_date = Timestamp::from_ymd(2024, 1, 2);
        done.end_date = Timestamp::from_ymd(2024, 1, 15);
        done.rating = Some(Rating::new(4).unwrap());
        series.books.push(done);
        series
            .books
            .push(Book::new(series.id, "The Jennifer Morgue", 2, ReadStatus::NotStarted).unwrap());

        let rows = Export::new(&[series]);
        assert_eq!(rows.len(), 1);

        let mut out = Vec::new();
        Export::export(&rows, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Title,Author,My Rating,Date Read,Date Added,Exclusive Shelf,Private Notes\n\
             The Atrocity Archives,Charles Stross,4,2024/01/15,2024/01/02,read,\n"
        );
    }
}
