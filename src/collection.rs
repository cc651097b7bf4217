use std::sync::{Arc, PoisonError, RwLock};

use crate::Post;

/// The most recently published list of posts.
///
/// Cloning the collection clones the handle, every clone observes the same
/// list. The list is only ever replaced as a whole so a reader holding a
/// [`snapshot`](Self::snapshot) sees either the old or the new posts.
#[derive(Debug, Clone)]
pub struct PostCollection {
    inner: Arc<RwLock<Arc<[Post]>>>,
}

impl Default for PostCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl PostCollection {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::from(Vec::new()))),
        }
    }

    pub fn snapshot(&self) -> Arc<[Post]> {
        let posts = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*posts)
    }

    pub fn replace(&self, posts: Vec<Post>) {
        let posts: Arc<[Post]> = Arc::from(posts);
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = posts;
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(titles: &[&str]) -> Vec<Post> {
        titles
            .iter()
            .map(|title| Post::builder().title(*title).build())
            .collect()
    }

    #[test]
    fn starts_empty() {
        let collection = PostCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.snapshot().len(), 0);
    }

    #[test]
    fn replace_swaps_whole_list() {
        let collection = PostCollection::new();
        collection.replace(posts(&["a", "b", "c"]));
        collection.replace(posts(&["d"]));
        let snapshot = collection.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].title, "d");
    }

    #[test]
    fn clones_share_the_list() {
        let writer = PostCollection::new();
        let reader = writer.clone();
        writer.replace(posts(&["shared"]));
        assert_eq!(reader.snapshot()[0].title, "shared");
    }

    #[test]
    fn old_snapshot_survives_replace() {
        let collection = PostCollection::new();
        collection.replace(posts(&["old"]));
        let before = collection.snapshot();
        collection.replace(posts(&["new", "newer"]));
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].title, "old");
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn readers_never_see_partial_lists() {
        let collection = PostCollection::new();
        collection.replace(posts(&["x"; 3]));
        let writer = {
            let collection = collection.clone();
            std::thread::spawn(move || {
                for n in 0..200 {
                    let len = if n % 2 == 0 { 7 } else { 3 };
                    collection.replace(posts(&vec!["y"; len]));
                }
            })
        };
        for _ in 0..200 {
            let len = collection.snapshot().len();
            assert!(len == 3 || len == 7, "torn read of {len} posts");
        }
        writer.join().unwrap();
    }
}
