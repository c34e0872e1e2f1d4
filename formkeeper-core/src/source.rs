// Submitted values the engine reads from

use crate::{FormError, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Lookup of submitted values by input name
pub trait ValueSource {
    /// First value submitted under `name`
    fn value(&self, name: &str) -> Option<&str>;

    /// Every value submitted under `name`, in submission order
    fn values(&self, name: &str) -> Vec<&str>;
}

impl ValueSource for HashMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn values(&self, name: &str) -> Vec<&str> {
        self.value(name).into_iter().collect()
    }
}

impl ValueSource for HashMap<String, Vec<String>> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    fn values(&self, name: &str) -> Vec<&str> {
        self.get(name)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Decoded form submission, keeping every value per name
///
/// ```
/// use formkeeper_core::{FormValues, ValueSource};
///
/// let form = FormValues::from_query("color=red&color=blue&name=John+Doe").unwrap();
/// assert_eq!(form.value("name"), Some("John Doe"));
/// assert_eq!(form.values("color"), vec!["red", "blue"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: IndexMap<String, Vec<String>>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = Self::new();
        for (name, value) in pairs {
            form.insert(name, value);
        }
        form
    }

    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_urlencoded(body: &[u8]) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| FormError::InvalidFormData(format!("Failed to parse form data: {}", e)))?;
        Ok(Self::from_pairs(pairs))
    }

    /// Parse a query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Result<Self> {
        Self::from_urlencoded(query.trim_start_matches('?').as_bytes())
    }

    /// Parse the text parts of a `multipart/form-data` body.
    ///
    /// Parts carrying a filename are uploads and are skipped.
    pub fn from_multipart(content_type: &str, body: &[u8]) -> Result<Self> {
        let boundary = content_type
            .split(';')
            .find_map(|part| part.trim().strip_prefix("boundary="))
            .map(|b| b.trim_matches('"'))
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                FormError::InvalidFormData("Missing boundary in Content-Type".to_string())
            })?;

        let marker = format!("--{}", boundary);
        let body = String::from_utf8_lossy(body);
        let mut form = Self::new();

        for part in body.split(marker.as_str()).skip(1) {
            let part = part.strip_prefix("\r\n").unwrap_or(part);
            if part.trim().is_empty() || part.starts_with("--") {
                continue;
            }

            let (headers, content) = part
                .split_once("\r\n\r\n")
                .or_else(|| part.split_once("\n\n"))
                .ok_or_else(|| {
                    FormError::InvalidFormData("Multipart part without headers".to_string())
                })?;

            let mut name = None;
            let mut is_file = false;
            for line in headers.lines() {
                let Some((header, value)) = line.split_once(':') else {
                    continue;
                };
                if !header.trim().eq_ignore_ascii_case("content-disposition") {
                    continue;
                }
                for attr in value.split(';').map(str::trim) {
                    if let Some(v) = attr.strip_prefix("name=") {
                        name = Some(v.trim_matches('"').to_string());
                    } else if attr.starts_with("filename=") {
                        is_file = true;
                    }
                }
            }

            let name = name.ok_or_else(|| {
                FormError::InvalidFormData("Missing field name in multipart part".to_string())
            })?;
            if is_file {
                continue;
            }

            let content = content
                .strip_suffix("\r\n")
                .or_else(|| content.strip_suffix('\n'))
                .unwrap_or(content);
            form.insert(name, content);
        }

        Ok(form)
    }

    /// Append a value under `name`
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueSource for FormValues {
    fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    fn values(&self, name: &str) -> Vec<&str> {
        self.values
            .get(name)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlencoded() {
        let form =
            FormValues::from_urlencoded(b"name=John+Doe&email=john%40example.com&tag=a&tag=b")
                .unwrap();

        assert_eq!(form.value("name"), Some("John Doe"));
        assert_eq!(form.value("email"), Some("john@example.com"));
        assert_eq!(form.values("tag"), vec!["a", "b"]);
        assert_eq!(form.value("missing"), None);
        assert!(form.values("missing").is_empty());
    }

    #[test]
    fn test_query_with_question_mark() {
        let form = FormValues::from_query("?username=foobar&password=short").unwrap();
        assert_eq!(form.value("username"), Some("foobar"));
        assert_eq!(form.names().collect::<Vec<_>>(), vec!["username", "password"]);
    }

    #[test]
    fn test_parse_multipart() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"username\"\r\n\r\n\
            foobar\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            PNGDATA\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"tag\"\r\n\r\n\
            one\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"tag\"\r\n\r\n\
            two\r\n\
            --XyZ--\r\n";

        let form =
            FormValues::from_multipart("multipart/form-data; boundary=XyZ", body.as_bytes())
                .unwrap();

        assert_eq!(form.value("username"), Some("foobar"));
        assert_eq!(form.values("tag"), vec!["one", "two"]);
        assert_eq!(form.value("avatar"), None);
    }

    #[test]
    fn test_multipart_requires_boundary() {
        let err = FormValues::from_multipart("multipart/form-data", b"").unwrap_err();
        assert!(matches!(err, FormError::InvalidFormData(_)));
    }

    #[test]
    fn test_hashmap_sources() {
        let mut single = HashMap::new();
        single.insert("name".to_string(), "john".to_string());
        assert_eq!(single.value("name"), Some("john"));
        // HashMap::values shadows the trait method
        assert_eq!(ValueSource::values(&single, "name"), vec!["john"]);

        let mut multi = HashMap::new();
        multi.insert("tag".to_string(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(multi.value("tag"), Some("a"));
        assert_eq!(ValueSource::values(&multi, "tag"), vec!["a", "b"]);
    }
}
