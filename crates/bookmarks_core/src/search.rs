use crate::Bookmark;

/// Case-insensitive substring match over title and url, preserving the
/// fetched order. An empty query keeps every bookmark.
pub fn filter_bookmarks<'a>(bookmarks: &'a [Bookmark], query: &str) -> Vec<&'a Bookmark> {
    if query.is_empty() {
        return bookmarks.iter().collect();
    }
    let needle = query.to_lowercase();
    bookmarks
        .iter()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle) || b.url.to_lowercase().contains(&needle)
        })
        .collect()
}
