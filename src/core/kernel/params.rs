use crate::core::errors::ExchangeError;

/// Insertion-ordered request parameter bag.
///
/// The signature is computed over the exact bytes sent, so parameter order is
/// load-bearing: keys render in the order they were first inserted. Inserting
/// an existing key overwrites the value in place and keeps the original
/// position.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a parameter, overwriting in place if the key already exists.
    pub fn insert(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    /// Builder-style `insert`.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a list-valued parameter rendered in the JSON-array wire form,
    /// e.g. `symbols=["BTCUSDT","BNBUSDT"]`. The exchange rejects the
    /// comma-separated spelling, so the brackets and quotes go on the wire
    /// (percent-encoded like any other value).
    pub fn insert_list<S: AsRef<str>>(&mut self, key: &str, items: &[S]) {
        let rendered = format!(
            "[{}]",
            items
                .iter()
                .map(|s| format!("\"{}\"", s.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        );
        self.insert(key, rendered);
    }

    /// Builder-style `insert_list`.
    #[must_use]
    pub fn with_list<S: AsRef<str>>(mut self, key: &str, items: &[S]) -> Self {
        self.insert_list(key, items);
        self
    }

    /// Insert only when the value is present.
    pub fn insert_opt(&mut self, key: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Builder-style `insert_opt`.
    #[must_use]
    pub fn with_opt(mut self, key: &str, value: Option<impl ToString>) -> Self {
        self.insert_opt(key, value);
        self
    }

    /// Append caller-supplied extra parameters after the mandatory ones, in
    /// the caller's order. A key colliding with an existing parameter is
    /// rejected rather than overwritten: a silent overwrite would change the
    /// signed bytes and the request semantics at once.
    pub fn merge_extra(&mut self, extra: Params) -> Result<(), ExchangeError> {
        for (key, value) in extra.entries {
            if self.contains_key(&key) {
                return Err(ExchangeError::InvalidParameters(format!(
                    "extra parameter '{}' collides with a mandatory parameter",
                    key
                )));
            }
            self.entries.push((key, value));
        }
        Ok(())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render `k1=v1&k2=v2&...` with percent-encoded values, in insertion
    /// order. This string is reused verbatim as the query (GET/DELETE) or the
    /// urlencoded body (POST/PUT), and is the exact input to signing.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(&k.to_string(), v);
        }
        params
    }
}
