//! Order directive translation.

use crate::filtering::spec::SortKey;
use crate::models::OrderDirective;
use crate::registry::ColumnRegistry;

/// Emits one sort key per surviving order directive, preserving the
/// directive order (the first directive is the primary key). Foreign
/// fields sort on their path target; plain and enumerated fields on the
/// field name (enumerated sorts by stored value, matching the backing
/// column).
#[must_use]
pub fn build_sort_keys(registry: &ColumnRegistry, orders: &[OrderDirective]) -> Vec<SortKey> {
    orders
        .iter()
        .filter_map(|order| {
            // directives only exist for decoded registry columns
            registry.field(&order.field).map(|field| SortKey {
                target: field.target().to_string(),
                ascending: order.ascending,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColumnRegistry {
        ColumnRegistry::builder()
            .plain("first_name")
            .foreign("company", "company.name")
            .enumerated("gender", [("M", "Male"), ("F", "Female")])
            .build()
            .unwrap()
    }

    fn directive(field: &str, ascending: bool) -> OrderDirective {
        OrderDirective { column_index: 0, field: field.to_string(), ascending }
    }

    #[test]
    fn keeps_directive_order() {
        let keys = build_sort_keys(
            &registry(),
            &[directive("gender", false), directive("first_name", true)],
        );
        assert_eq!(
            keys,
            vec![
                SortKey { target: "gender".into(), ascending: false },
                SortKey { target: "first_name".into(), ascending: true },
            ]
        );
    }

    #[test]
    fn foreign_fields_sort_on_their_path() {
        let keys = build_sort_keys(&registry(), &[directive("company", true)]);
        assert_eq!(keys, vec![SortKey { target: "company.name".into(), ascending: true }]);
    }

    #[test]
    fn no_directives_no_keys() {
        assert!(build_sort_keys(&registry(), &[]).is_empty());
    }
}
