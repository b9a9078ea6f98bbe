use anyhow::{bail, Result};
use rwapi::{DateInterval, Facet, Filter, FilterValue, RangeValue, Scalar, SortDirection};

/// Parses `field=value`, `field!=value`, `field=a|b|c` and `field=from..to`
/// (either bound may be left empty) into a leaf filter.
pub fn parse_filter(expr: &str) -> Result<Filter> {
    let (field, raw_value, negate) = if let Some((field, value)) = expr.split_once("!=") {
        (field, value, true)
    } else if let Some((field, value)) = expr.split_once('=') {
        (field, value, false)
    } else {
        bail!(
            "Expected filter format `field=value` or `field!=value`, found {}",
            expr
        );
    };

    let field = field.trim();
    if field.is_empty() {
        bail!("Missing field name in filter {}", expr);
    }

    let value = parse_value(raw_value.trim());
    Ok(Filter::new_leaf(field, value, None, negate)?)
}

fn parse_value(raw: &str) -> FilterValue {
    if let Some((from, to)) = raw.split_once("..") {
        let bound = |s: &str| (!s.trim().is_empty()).then(|| parse_scalar(s.trim()));
        return FilterValue::Range(RangeValue {
            from: bound(from),
            to: bound(to),
        });
    }
    if raw.contains('|') {
        return FilterValue::List(raw.split('|').map(|s| parse_scalar(s.trim())).collect());
    }
    FilterValue::Scalar(parse_scalar(raw))
}

pub fn parse_scalar(raw: &str) -> Scalar {
    if let Ok(b) = raw.parse::<bool>() {
        return Scalar::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Scalar::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Scalar::Float(f);
        }
    }
    Scalar::Text(raw.to_string())
}

/// Parses `field:asc` / `field:desc`. Without a direction the sort is ascending.
pub fn parse_sort(spec: &str) -> Result<(String, SortDirection)> {
    let (field, direction) = match spec.rsplit_once(':') {
        Some((field, direction)) => (field, direction.parse::<SortDirection>()?),
        None => (spec, SortDirection::Asc),
    };
    if field.is_empty() {
        bail!("Missing field name in sort {}", spec);
    }
    Ok((field.to_string(), direction))
}

/// Parses `field` or `field:year|month|day`.
pub fn parse_facet(spec: &str, limit: Option<u32>) -> Result<Facet> {
    let (field, interval) = match spec.rsplit_once(':') {
        Some((field, interval)) => (field, Some(interval.parse::<DateInterval>()?)),
        None => (spec, None),
    };
    if field.is_empty() {
        bail!("Missing field name in facet {}", spec);
    }

    let mut facet = Facet::new(field);
    match (interval, limit) {
        (Some(interval), _) => {
            facet.set_interval(interval);
        }
        (None, Some(limit)) => {
            facet.set_limit(limit);
        }
        (None, None) => {}
    }
    Ok(facet)
}
