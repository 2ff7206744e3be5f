use std::collections::BTreeMap;

/// Field-keyed validation messages collected while checking a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn has_any(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All messages, ordered by field name
    pub fn messages(&self) -> Vec<String> {
        self.errors.values().flatten().cloned().collect()
    }

    /// Record `"{name} can not be blank."` when `value` is empty or whitespace.
    pub fn require(&mut self, field: &str, name: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} can not be blank.", name));
        }
    }

    /// Parse an integer field, recording an error when it is not a number.
    pub fn parse_int(&mut self, field: &str, name: &str, value: &str) -> Option<i32> {
        match value.trim().parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.add(field, format!("{} must be a whole number.", name));
                None
            }
        }
    }
}
