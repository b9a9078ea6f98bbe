use serde::Serialize;
use strum::{Display, EnumString};

use crate::errors::RwApiError;

/// Boolean operator combining the conditions of a filter, or the values of a
/// list-valued condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Operator {
    And,
    Or,
}

/// Single filter value: string, boolean, integer or float.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value.into())
                }
            }

            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
}

/// Bounds of a range condition. A missing bound leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Scalar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Scalar>,
}

impl RangeValue {
    pub fn between(from: impl Into<Scalar>, to: impl Into<Scalar>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    pub fn starting_at(from: impl Into<Scalar>) -> Self {
        Self {
            from: Some(from.into()),
            to: None,
        }
    }

    pub fn up_to(to: impl Into<Scalar>) -> Self {
        Self {
            from: None,
            to: Some(to.into()),
        }
    }
}

/// Value of a leaf condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Range(RangeValue),
}

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<RangeValue> for FilterValue {
    fn from(value: RangeValue) -> Self {
        FilterValue::Range(value)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Node of a filter tree.
///
/// A leaf carries a `field` and a `value`; a composite carries an operator and
/// child conditions. Trees mixing both are passed to the API unchanged.
///
/// Filters are plain owned values: a tree must have a single writer at a time
/// and should be treated as read-only once attached to a query or facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    operator: Option<Operator>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    negate: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<FilterValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty composite whose conditions must all match.
    pub fn all() -> Self {
        Self {
            operator: Some(Operator::And),
            ..Self::default()
        }
    }

    /// Empty composite where at least one condition must match.
    pub fn any() -> Self {
        Self {
            operator: Some(Operator::Or),
            ..Self::default()
        }
    }

    /// Leaf condition on `field`.
    pub fn condition(
        field: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Result<Self, RwApiError> {
        let field = field.into();
        if field.is_empty() {
            return Err(RwApiError::EmptyFilterField);
        }
        Ok(Self {
            field: Some(field),
            value: Some(value.into()),
            ..Self::default()
        })
    }

    pub fn new_leaf(
        field: impl Into<String>,
        value: impl Into<FilterValue>,
        operator: Option<Operator>,
        negate: bool,
    ) -> Result<Self, RwApiError> {
        let mut leaf = Self::condition(field, value)?;
        leaf.set_operator(operator);
        leaf.set_negate(negate);
        Ok(leaf)
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Sets the operator. `None` keeps the current one.
    pub fn set_operator(&mut self, operator: Option<Operator>) {
        if let Some(operator) = operator {
            self.operator = Some(operator);
        }
    }

    pub fn set_negate(&mut self, negate: bool) {
        self.negate = negate;
    }

    pub fn set_field(&mut self, field: impl Into<String>) {
        self.field = Some(field.into());
    }

    pub fn set_value(&mut self, value: impl Into<FilterValue>) {
        self.value = Some(value.into());
    }

    /// Builds a leaf condition and appends it to the conditions of this filter.
    pub fn add_condition(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FilterValue>,
        operator: Option<Operator>,
        negate: bool,
    ) -> Result<&mut Self, RwApiError> {
        let leaf = Self::new_leaf(field, value, operator, negate)?;
        Ok(self.add_filter(leaf))
    }

    /// Appends `filter` to the conditions, collapsing it first if it only wraps
    /// a single condition.
    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.conditions.push(filter.canonicalize());
        self
    }

    /// Replaces a composite holding exactly one condition by that condition,
    /// down to the first node that is not such a wrapper.
    ///
    /// The child is not returned untouched when the wrapper is negated: its
    /// negation is flipped, so `NOT(AND(x))` becomes `NOT x` rather than `x`.
    /// A non-negated wrapper yields the child exactly as it was added.
    pub fn canonicalize(mut self) -> Filter {
        while self.field.is_none() && self.value.is_none() && self.conditions.len() == 1 {
            let negate = self.negate;
            match self.conditions.pop() {
                Some(child) => {
                    self = child;
                    self.negate ^= negate;
                }
                None => break,
            }
        }
        self
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    pub fn conditions(&self) -> &[Filter] {
        &self.conditions
    }

    pub fn is_leaf(&self) -> bool {
        self.conditions.is_empty() && self.field.is_some()
    }

    pub fn is_composite(&self) -> bool {
        !self.conditions.is_empty()
    }
}
