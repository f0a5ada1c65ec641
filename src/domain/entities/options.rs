pub const ALL_VALUE: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        SelectOption {
            label: value.clone(),
            value,
        }
    }

    pub fn all() -> Self {
        SelectOption::new(ALL_VALUE)
    }

    pub fn is_all(&self) -> bool {
        self.value == ALL_VALUE
    }
}

/// Option sets for the independent selects, supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub company_options: Vec<SelectOption>,
    pub branch_options: Vec<SelectOption>,
    pub town_options: Vec<SelectOption>,
    pub zone_options: Vec<SelectOption>,
}
