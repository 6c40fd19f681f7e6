//! The search-parameters object (§4.8 / §3): an ordered list of
//! `(name, value)` pairs, live-bound to a URL's query string. Every mutating
//! method re-serializes the list and writes it back into the parent URL
//! immediately, mirroring the `update()`-after-every-mutation pattern of
//! `url_search_parameters` in the original C++ implementation this was
//! ported from -- translated here as a borrow of the parent `Url` rather
//! than a non-owning back-pointer, since Rust's ownership model has no use
//! for the latter.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::Url;

/// Obtained from [`Url::search_params_mut`].
pub struct SearchParams<'a> {
    url: &'a mut Url,
    pairs: Vec<(String, String)>,
}

impl<'a> SearchParams<'a> {
    pub(crate) fn new(url: &'a mut Url) -> Self {
        let pairs = url
            .query()
            .map(|query| {
                form_urlencoded::parse(query.as_bytes())
                    .map(|(name, value)| (name.into_owned(), value.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        SearchParams { url, pairs }
    }

    fn update(&mut self) {
        if self.pairs.is_empty() {
            self.url.set_query(None);
            return;
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(self.pairs.iter().map(|(name, value)| (name.as_str(), value.as_str())));
        let serialized = serializer.finish();
        self.url.set_query(Some(serialized.as_str()));
    }

    /// Appends a `(name, value)` pair, keeping any existing pair with the
    /// same name.
    pub fn append(&mut self, name: &str, value: &str) -> &mut Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self.update();
        self
    }

    /// Removes every pair whose name is `name`.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.pairs.retain(|(n, _)| n != name);
        self.update();
        self
    }

    /// The value of the first pair named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// The values of every pair named `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs.iter().filter(|(n, _)| n == name).map(|(_, v)| v.as_str()).collect()
    }

    /// Whether any pair is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    /// Sets `name`'s value: updates the first existing pair named `name` and
    /// removes any others with that name, or appends a new pair if none
    /// exists.
    pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
        let mut found = false;
        let mut i = 0;
        while i < self.pairs.len() {
            if self.pairs[i].0 == name {
                if found {
                    self.pairs.remove(i);
                    continue;
                }
                self.pairs[i].1 = value.to_string();
                found = true;
            }
            i += 1;
        }
        if !found {
            self.pairs.push((name.to_string(), value.to_string()));
        }
        self.update();
        self
    }

    /// Removes every pair.
    pub fn clear(&mut self) -> &mut Self {
        self.pairs.clear();
        self.update();
        self
    }

    /// Stably sorts the pairs by name.
    pub fn sort(&mut self) -> &mut Self {
        self.pairs.sort_by(|a, b| a.0.cmp(&b.0));
        self.update();
        self
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// An iterator over the pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a, 'b> IntoIterator for &'b SearchParams<'a> {
    type Item = (&'b str, &'b str);
    type IntoIter = alloc::boxed::Box<dyn Iterator<Item = (&'b str, &'b str)> + 'b>;

    fn into_iter(self) -> Self::IntoIter {
        alloc::boxed::Box::new(self.iter())
    }
}

/// Appends every pair from `iter`, re-serializing into the parent URL once
/// after the whole batch rather than on each pair.
impl<'a> Extend<(String, String)> for SearchParams<'a> {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.pairs.extend(iter);
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use crate::Url;

    #[test]
    fn append_and_get() {
        let mut url = Url::parse("https://example.com/search").unwrap();
        url.search_params_mut().append("q", "rust").append("lang", "en");
        assert_eq!(url.query(), Some("q=rust&lang=en"));
        let params = url.search_params_mut();
        assert_eq!(params.get("q"), Some("rust"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn set_replaces_first_and_drops_duplicates() {
        let mut url = Url::parse("https://example.com/?a=1&b=2&a=3").unwrap();
        url.search_params_mut().set("a", "9");
        assert_eq!(url.query(), Some("a=9&b=2"));
    }

    #[test]
    fn remove_drops_all_matches() {
        let mut url = Url::parse("https://example.com/?a=1&b=2&a=3").unwrap();
        url.search_params_mut().remove("a");
        assert_eq!(url.query(), Some("b=2"));
    }

    #[test]
    fn sort_is_stable_by_name() {
        let mut url = Url::parse("https://example.com/?q=%F0%9F%8F%B3%EF%B8%8F%E2%80%8D%F0%9F%8C%88&key=e1f7bc78").unwrap();
        url.search_params_mut().sort();
        assert_eq!(
            url.query(),
            Some("key=e1f7bc78&q=%F0%9F%8F%B3%EF%B8%8F%E2%80%8D%F0%9F%8C%88")
        );
    }

    #[test]
    fn clearing_all_pairs_clears_the_query() {
        let mut url = Url::parse("https://example.com/?a=1").unwrap();
        url.search_params_mut().clear();
        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn into_iter_yields_pairs_in_order() {
        let mut url = Url::parse("https://example.com/?a=1&b=2").unwrap();
        let params = url.search_params_mut();
        let collected: alloc::vec::Vec<_> = (&*params).into_iter().collect();
        assert_eq!(collected, [("a", "1"), ("b", "2")]);
    }

    #[test]
    fn extend_appends_and_reserializes_once() {
        let mut url = Url::parse("https://example.com/?a=1").unwrap();
        url.search_params_mut().extend([
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ]);
        assert_eq!(url.query(), Some("a=1&b=2&c=3"));
    }
}
