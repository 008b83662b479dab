//! Transaction entity and the transient request types around it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category substituted when a transaction is created without one
pub const DEFAULT_CATEGORY: &str = "other";

/// A persisted monetary transaction owned by a single user
///
/// `id` is assigned by the store on insert and never changes afterwards;
/// records built before insertion carry an empty id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub name: String,
    pub cost: f64,
    pub date: DateTime<Utc>,
}

impl Transaction {
    /// Build a record that has not been inserted yet
    pub fn unsaved(
        user_id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        cost: f64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            category: category.into(),
            name: name.into(),
            cost,
            date,
        }
    }
}

/// Input of the create operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewTransaction {
    /// Empty means [`DEFAULT_CATEGORY`]
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub cost: f64,
    /// Explicit timestamp in [`DATE_TIME_FORMAT`](crate::core::datetime::DATE_TIME_FORMAT);
    /// `None` means "now"
    #[serde(default)]
    pub date: Option<String>,
}

impl NewTransaction {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, cost: f64) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            cost,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Input of the update operation
///
/// Each override is independent: `None` keeps the stored value. `date` and
/// `time` are recombined with the stored timestamp when only one is given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub category: Option<String>,
    pub name: Option<String>,
    pub cost: Option<f64>,
    /// Calendar date in [`DATE_FORMAT`](crate::core::datetime::DATE_FORMAT)
    pub date: Option<String>,
    /// Time of day in [`TIME_FORMAT`](crate::core::datetime::TIME_FORMAT)
    pub time: Option<String>,
}

impl TransactionPatch {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// True when no override is present
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.name.is_none()
            && self.cost.is_none()
            && self.date.is_none()
            && self.time.is_none()
    }

    /// Apply the non-temporal overrides onto `existing`
    ///
    /// An empty category override becomes [`DEFAULT_CATEGORY`], as on create.
    /// The timestamp is resolved separately by
    /// [`compose_timestamp`](crate::core::datetime::compose_timestamp).
    pub fn merge_into(&self, existing: &Transaction) -> Transaction {
        let category = match self.category.as_deref() {
            Some("") => DEFAULT_CATEGORY.to_string(),
            Some(category) => category.to_string(),
            None => existing.category.clone(),
        };

        Transaction {
            id: existing.id.clone(),
            user_id: existing.user_id.clone(),
            category,
            name: self.name.clone().unwrap_or_else(|| existing.name.clone()),
            cost: self.cost.unwrap_or(existing.cost),
            date: existing.date,
        }
    }
}

/// Optional date-only bounds of a range query, as received from callers
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRange {
    pub fn new(start_date: Option<&str>, end_date: Option<&str>) -> Self {
        Self {
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
        }
    }

    /// Both bounds open
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// A user confirmed to exist by the identity service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub display_name: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}
