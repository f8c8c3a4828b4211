//! Order block decoding.

use crate::decode::RawParams;
use crate::errors::DataTablesError;
use crate::models::{ColumnSlot, OrderDirective};

/// Scans `order[i][...]` blocks in index order until the first index
/// missing either key, bounded by the number of registered fields.
///
/// A non-numeric column reference is structural and rejects the request.
/// A reference that resolves out of range, to a placeholder, or to a
/// column whose request-local `orderable` flag is off drops that single
/// entry and continues; the surviving directives keep their relative
/// order. Direction is ascending only for the literal `"asc"`.
pub(crate) fn decode_orders(
    params: &RawParams,
    columns: &[ColumnSlot],
    max_orders: usize,
) -> Result<Vec<OrderDirective>, DataTablesError> {
    let mut orders = Vec::new();

    for index in 0..max_orders {
        let Some(reference) = params.get(&format!("order[{index}][column]")) else {
            break;
        };
        let Some(direction) = params.get(&format!("order[{index}][dir]")) else {
            break;
        };
        let column_index: usize = reference.parse().map_err(|_| {
            DataTablesError::bad_request(format!("'order[{index}][column]' must be a column index"))
        })?;
        match columns.get(column_index) {
            Some(ColumnSlot::Active(column)) if column.orderable => {
                orders.push(OrderDirective {
                    column_index,
                    field: column.name.clone(),
                    ascending: direction == "asc",
                });
            }
            // out of range, placeholder or non-orderable: drop this entry
            _ => {}
        }
    }

    Ok(orders)
}
