//! Header map with HTTP field semantics.
//!
//! Names compare case-insensitively (RFC 7230 §3.2) while the spelling used
//! by the caller (or seen on the wire) is preserved for emission. Repeated
//! names on the input path are coalesced into a single entry joined with
//! `", "` in arrival order. Empty names are rejected.

/// A mapping from header name to header value.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Lookup with a fallback value for absent names.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets `name` to `value`, replacing any existing entry for the name.
    /// Entries with an empty name are rejected and silently dropped.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Adds `value` under `name`, coalescing with an existing entry by
    /// appending `", "` and the new value. This is the input-side operation
    /// used for repeated header lines.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => {
                entry.1.push_str(", ");
                entry.1.push_str(&value);
            }
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries with caller spelling preserved. Iteration order is an
    /// implementation detail and not part of the contract.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", "text/plain");

        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(headers.get("Content-Length"), None);
        assert_eq!(headers.get_or("accept", "*/*"), "*/*");
    }

    #[test]
    fn append_coalesces_in_arrival_order() {
        let mut headers = HeaderMap::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("text/html, application/json"));
    }

    #[test]
    fn insert_replaces_across_case() {
        let mut headers = HeaderMap::new();
        headers.insert("date", "old");
        headers.insert("Date", "new");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("DATE"), Some("new"));
    }

    #[test]
    fn caller_spelling_is_preserved() {
        let mut headers = HeaderMap::new();
        headers.insert("X-CuStOm", "1");

        let emitted: Vec<_> = headers.iter().collect();
        assert_eq!(emitted, vec![("X-CuStOm", "1")]);
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("", "value");
        headers.append("", "value");
        assert!(headers.is_empty());
    }

    #[test]
    fn remove_returns_value() {
        let mut headers = HeaderMap::new();
        headers.insert("Transfer-Encoding", "chunked");
        assert_eq!(headers.remove("transfer-encoding"), Some("chunked".to_string()));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("transfer-encoding"), None);
    }
}
