use tracing::debug;

use crate::{error::PersistenceError, store::Store, types::author::Author};

/// Returns the author named exactly `name`, creating and inserting one if there is none yet.
///
/// Names are opaque: no trimming, no case folding. Calls have to be serialized by the caller for
/// the one-author-per-name guarantee to hold.
pub async fn resolve_author<S: Store>(store: &mut S, name: &str) -> Result<Author, PersistenceError> {
    if let Some(author) = store.find_author_by_name(name).await? {
        return Ok(author);
    }
    let author = Author::new(name);
    debug!("Creating author '{}' ({}).", author.name, author.id);
    store.insert(author.clone().into()).await?;
    Ok(author)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn resolving_twice_creates_one_author() {
        let mut store = MemoryStore::new();
        let first = resolve_author(&mut store, "Ann Leckie").await.unwrap();
        let second = resolve_author(&mut store, "Ann Leckie").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.authors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn names_are_compared_exactly() {
        let mut store = MemoryStore::new();
        let a = resolve_author(&mut store, "Ann Leckie").await.unwrap();
        let b = resolve_author(&mut store, "ann leckie").await.unwrap();
        let c = resolve_author(&mut store, "Ann Leckie ").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(store.authors().await.unwrap().len(), 3);
    }
}
