use std::collections::HashMap;

/// Display strings served by `GET /api/lang`.
///
/// Loaded once at startup and replaced wholesale when the language changes.
/// A failed fetch keeps whatever was loaded before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangContext {
    messages: HashMap<String, String>,
}

impl Default for LangContext {
    fn default() -> Self {
        let mut messages = HashMap::new();
        messages.insert("sending".to_string(), "Sending...".to_string());
        Self { messages }
    }
}

impl LangContext {
    #[cfg(test)]
    pub(crate) fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn replace(&mut self, messages: HashMap<String, String>) {
        self.messages = messages;
    }

    /// 空字串視同沒有
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// 依 key 排序
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .messages
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}
