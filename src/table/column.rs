//! Column descriptors and cell values for [`TableState`](super::TableState).

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use chrono::NaiveDate;

/// A row that can be shown in a table.
///
/// Rows without an id are rendered but can never be selected.
pub trait TableRow {
    type Id: Clone + Eq + Hash + fmt::Debug;

    fn id(&self) -> Option<Self::Id>;
}

/// A single cell value extracted from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Ordering used for client-side sorting.
    ///
    /// Values of the same kind compare naturally and numbers compare across
    /// `Int`/`Float`. Different kinds are grouped by a fixed rank with `Null`
    /// last, so this is a total order and safe to hand to `sort_by`.
    pub fn loose_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            // An int sorts before a float of the same magnitude.
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Text(_) => 2,
            Value::Date(_) => 3,
            Value::Null => 4,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type Renderer<T> = Box<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// How one field of `T` is labelled, sorted and displayed.
pub struct Column<T> {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    /// Width hint in percent of the table width.
    pub width: Option<u16>,
    accessor: Accessor<T>,
    render: Option<Renderer<T>>,
}

impl<T> Column<T> {
    pub fn new<F>(key: &'static str, label: &'static str, accessor: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self {
            key,
            label,
            sortable: false,
            width: None,
            accessor: Box::new(accessor),
            render: None,
        }
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub fn width(mut self, percent: u16) -> Self {
        self.width = Some(percent.min(100));
        self
    }

    /// Display the cell through `render` instead of the raw value.
    #[must_use]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &T) -> String + Send + Sync + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    pub fn value(&self, row: &T) -> Value {
        (self.accessor)(row)
    }

    /// Text shown in the cell for `row`.
    pub fn display(&self, row: &T) -> String {
        let value = self.value(row);
        match &self.render {
            Some(render) => render(&value, row),
            None => value.to_string(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .field("render", &self.render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Member {
        name: String,
        fee: f64,
    }

    #[test]
    fn numbers_compare_across_kinds() {
        assert_eq!(Value::Int(2).loose_cmp(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::Float(3.0).loose_cmp(&Value::Int(1)), Ordering::Greater);
    }

    #[test]
    fn null_sorts_after_everything() {
        assert_eq!(Value::Null.loose_cmp(&Value::Int(1)), Ordering::Greater);
        assert_eq!(Value::Text("a".into()).loose_cmp(&Value::Null), Ordering::Less);
        assert_eq!(Value::Null.loose_cmp(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn mixed_kinds_are_grouped_by_rank() {
        assert_eq!(Value::Text("a".into()).loose_cmp(&Value::Int(1)), Ordering::Greater);
        assert_eq!(Value::Bool(true).loose_cmp(&Value::Float(0.5)), Ordering::Less);
        assert_eq!(Value::Int(2).loose_cmp(&Value::Float(2.0)), Ordering::Less);
        assert_eq!(Value::Float(f64::NAN).loose_cmp(&Value::Float(f64::NAN)), Ordering::Equal);
    }

    #[test]
    fn ordering_is_consistent_over_mixed_values() {
        let values = vec![
            Value::Null,
            Value::Int(3),
            Value::Float(f64::NAN),
            Value::Float(2.5),
            Value::Text("b".into()),
            Value::Bool(false),
            Value::Int(-1),
            Value::Float(3.0),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Value::Text("a".into()),
        ];
        for a in &values {
            assert_eq!(a.loose_cmp(a), Ordering::Equal);
            for b in &values {
                assert_eq!(a.loose_cmp(b), b.loose_cmp(a).reverse());
                for c in &values {
                    if a.loose_cmp(b) != Ordering::Greater && b.loose_cmp(c) != Ordering::Greater {
                        assert_ne!(a.loose_cmp(c), Ordering::Greater);
                    }
                }
            }
        }
    }

    #[test]
    fn null_displays_as_empty() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(None::<String>), Value::Null);
    }

    #[test]
    fn render_takes_precedence_over_raw_value() {
        let raw: Column<Member> = Column::new("fee", "Cuota", |m: &Member| m.fee.into());
        let formatted: Column<Member> = Column::new("fee", "Cuota", |m: &Member| m.fee.into())
            .render(|v, m| format!("{} ${}", m.name, v));
        let member = Member { name: "Ana".into(), fee: 350.5 };

        assert_eq!(raw.display(&member), "350.5");
        assert_eq!(formatted.display(&member), "Ana $350.5");
    }

    #[test]
    fn width_hint_is_capped() {
        let col: Column<Member> = Column::new("name", "Nombre", |m: &Member| m.name.as_str().into()).width(250);
        assert_eq!(col.width, Some(100));
    }
}
