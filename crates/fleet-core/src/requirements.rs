//! Label requirements and their compatibility algebra.
//!
//! A [`Requirement`] constrains one label key with an [`Operator`] and a
//! value set. A [`Requirements`] set is the conjunction of requirements on
//! distinct keys. Two sets are compatible when every key they share admits
//! at least one common value; keys present on only one side are
//! unconstrained on the other.
//!
//! Value sets keep insertion order. The first value of an `In` requirement
//! is the default label value when an instance type is materialized.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{CoreError, CoreResult};

/// Requirement operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    In,
    NotIn,
    Exists,
    DoesNotExist,
    Gt,
    Lt,
}

impl Operator {
    /// Whether the operator carries a value set.
    pub fn is_value_bearing(self) -> bool {
        !matches!(self, Operator::Exists | Operator::DoesNotExist)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::In => "In",
            Operator::NotIn => "NotIn",
            Operator::Exists => "Exists",
            Operator::DoesNotExist => "DoesNotExist",
            Operator::Gt => "Gt",
            Operator::Lt => "Lt",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two requirement sets disagree on a shared key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incompatible requirements for key {key:?}")]
pub struct ConflictError {
    pub key: String,
}

/// A single constraint on one label key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement")]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: IndexSet<String>,
}

#[derive(Deserialize)]
struct RawRequirement {
    key: String,
    operator: Operator,
    #[serde(default)]
    values: Vec<String>,
}

impl TryFrom<RawRequirement> for Requirement {
    type Error = CoreError;

    fn try_from(raw: RawRequirement) -> Result<Self, Self::Error> {
        Requirement::new(raw.key, raw.operator, raw.values)
    }
}

impl Requirement {
    /// Build a requirement, enforcing that `values` is non-empty exactly
    /// when the operator is value-bearing, and that `Gt`/`Lt` carry a
    /// single integer bound.
    pub fn new<V: Into<String>>(
        key: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = V>,
    ) -> CoreResult<Self> {
        let key = key.into();
        let values: IndexSet<String> = values.into_iter().map(Into::into).collect();
        let invalid = |reason: String| CoreError::InvalidRequirement {
            key: key.clone(),
            reason,
        };

        if operator.is_value_bearing() && values.is_empty() {
            return Err(invalid(format!("operator {operator} requires at least one value")));
        }
        if !operator.is_value_bearing() && !values.is_empty() {
            return Err(invalid(format!("operator {operator} takes no values")));
        }
        if matches!(operator, Operator::Gt | Operator::Lt) {
            if values.len() != 1 {
                return Err(invalid(format!("operator {operator} takes exactly one bound")));
            }
            if let Some(bound) = values.first() {
                if bound.parse::<i64>().is_err() {
                    return Err(invalid(format!("bound {bound:?} is not an integer")));
                }
            }
        }

        Ok(Self {
            key,
            operator,
            values,
        })
    }

    /// `key In [value]`.
    pub fn in_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::In,
            values: IndexSet::from([value.into()]),
        }
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::Exists,
            values: IndexSet::new(),
        }
    }

    pub fn does_not_exist(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Operator::DoesNotExist,
            values: IndexSet::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Values in insertion order.
    pub fn values(&self) -> &IndexSet<String> {
        &self.values
    }

    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Numeric bound of a `Gt` / `Lt` requirement.
    pub fn bound(&self) -> Option<i64> {
        match self.operator {
            Operator::Gt | Operator::Lt => self.first_value()?.parse().ok(),
            _ => None,
        }
    }

    /// Whether a `Gt`/`Lt` bound admits `value` read as an integer.
    fn admits_number(&self, value: &str) -> bool {
        let (Ok(n), Some(bound)) = (value.parse::<i64>(), self.bound()) else {
            return false;
        };
        match self.operator {
            Operator::Gt => n > bound,
            Operator::Lt => n < bound,
            _ => false,
        }
    }

    /// Pairwise compatibility of two requirements on the same key.
    ///
    /// Symmetric: `a.compatible_with(&b) == b.compatible_with(&a)`.
    pub fn compatible_with(&self, other: &Requirement) -> bool {
        use Operator::*;

        match (self.operator, other.operator) {
            (In, In) => self.values.iter().any(|v| other.values.contains(v)),
            (In, NotIn) => self.values.iter().any(|v| !other.values.contains(v)),
            (NotIn, In) => other.values.iter().any(|v| !self.values.contains(v)),
            (In, Gt | Lt) => self.values.iter().any(|v| other.admits_number(v)),
            (Gt | Lt, In) => other.values.iter().any(|v| self.admits_number(v)),
            (Gt, Lt) => bounds_overlap(self.bound(), other.bound()),
            (Lt, Gt) => bounds_overlap(other.bound(), self.bound()),
            (DoesNotExist, DoesNotExist) => true,
            (DoesNotExist, In | NotIn | Exists | Gt | Lt)
            | (In | NotIn | Exists | Gt | Lt, DoesNotExist) => false,
            (Exists, In | NotIn | Exists | Gt | Lt) | (In | NotIn | Gt | Lt, Exists) => true,
            (NotIn, NotIn | Gt | Lt) | (Gt | Lt, NotIn) => true,
            (Gt, Gt) | (Lt, Lt) => true,
        }
    }
}

/// Integer interval `(gt, lt)` is non-empty.
fn bounds_overlap(gt: Option<i64>, lt: Option<i64>) -> bool {
    match (gt, lt) {
        (Some(gt), Some(lt)) => gt.checked_add(1).is_some_and(|low| low < lt),
        _ => false,
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.operator)?;
        if self.operator.is_value_bearing() {
            let values: Vec<&str> = self.values.iter().map(String::as_str).collect();
            write!(f, " [{}]", values.join(", "))?;
        }
        Ok(())
    }
}

/// Parses the command-line form:
///
/// ```text
/// key=a,b   In        key!=a   NotIn
/// key       Exists    !key     DoesNotExist
/// key>3     Gt        key<3    Lt
/// ```
impl FromStr for Requirement {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CoreError::InvalidExpression(s.to_string());
        let split_values = |values: &str| -> Vec<String> {
            values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        };

        let (key, operator, values) = if let Some(key) = s.strip_prefix('!') {
            (key, Operator::DoesNotExist, Vec::new())
        } else if let Some((key, values)) = s.split_once("!=") {
            (key, Operator::NotIn, split_values(values))
        } else if let Some((key, values)) = s.split_once('=') {
            (key, Operator::In, split_values(values))
        } else if let Some((key, bound)) = s.split_once('>') {
            (key, Operator::Gt, split_values(bound))
        } else if let Some((key, bound)) = s.split_once('<') {
            (key, Operator::Lt, split_values(bound))
        } else {
            (s, Operator::Exists, Vec::new())
        };

        let key = key.trim();
        if key.is_empty() || key.contains(['=', '<', '>', '!']) {
            return Err(invalid());
        }
        Requirement::new(key, operator, values)
    }
}

/// Conjunction of requirements, keyed and iterated by label key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Requirement>", from = "Vec<Requirement>")]
pub struct Requirements(BTreeMap<String, Requirement>);

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requirement.
    ///
    /// Two `In` requirements on the same key merge by set union, keeping
    /// existing values first. Any other same-key combination is replaced
    /// by `requirement`.
    pub fn add(&mut self, requirement: Requirement) {
        match self.0.entry(requirement.key.clone()) {
            Entry::Occupied(mut slot)
                if slot.get().operator == Operator::In && requirement.operator == Operator::In =>
            {
                slot.get_mut().values.extend(requirement.values);
            }
            Entry::Occupied(mut slot) => {
                slot.insert(requirement);
            }
            Entry::Vacant(slot) => {
                slot.insert(requirement);
            }
        }
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, requirement: Requirement) -> Self {
        self.add(requirement);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Requirement> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.0.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every shared key; report the first conflicting key in key order.
    pub fn compatible(&self, other: &Requirements) -> Result<(), ConflictError> {
        for (key, requirement) in &self.0 {
            if let Some(theirs) = other.0.get(key) {
                if !requirement.compatible_with(theirs) {
                    return Err(ConflictError { key: key.clone() });
                }
            }
        }
        Ok(())
    }

    /// Default labels: the first value of every `In` requirement.
    pub fn labels(&self) -> BTreeMap<String, String> {
        self.iter()
            .filter(|r| r.operator == Operator::In)
            .filter_map(|r| Some((r.key.clone(), r.first_value()?.to_string())))
            .collect()
    }
}

impl FromIterator<Requirement> for Requirements {
    fn from_iter<I: IntoIterator<Item = Requirement>>(iter: I) -> Self {
        let mut requirements = Requirements::new();
        for requirement in iter {
            requirements.add(requirement);
        }
        requirements
    }
}

impl From<Vec<Requirement>> for Requirements {
    fn from(requirements: Vec<Requirement>) -> Self {
        requirements.into_iter().collect()
    }
}

impl From<Requirements> for Vec<Requirement> {
    fn from(requirements: Requirements) -> Self {
        requirements.0.into_values().collect()
    }
}

impl fmt::Display for Requirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.iter().map(ToString::to_string).collect();
        write!(f, "{{{}}}", rendered.join("; "))
    }
}
