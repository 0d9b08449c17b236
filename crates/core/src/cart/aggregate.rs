//! Cart aggregation

use rustc_hash::FxHashMap;

use crate::{cart::CartLineItem, products::ProductId};

/// Cart lines for one product, with quantities summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateLine {
    /// Product identifier
    pub product_id: ProductId,

    /// Name from the first raw line for the product
    pub product_name: String,

    /// Image from the first raw line for the product
    pub image: String,

    /// Sum of raw quantities
    pub quantity: u32,
}

/// Group raw lines by product id, keeping first-seen order.
///
/// Raw storage can hold several lines for the same product (older writes,
/// or two tabs writing over each other); this is the view totals use.
pub fn aggregate(lines: &[CartLineItem]) -> Vec<AggregateLine> {
    let mut positions = FxHashMap::<ProductId, usize>::default();
    let mut grouped: Vec<AggregateLine> = Vec::with_capacity(lines.len());

    for line in lines {
        let existing = positions
            .get(&line.product_id)
            .and_then(|&idx| grouped.get_mut(idx));

        if let Some(group) = existing {
            group.quantity = group.quantity.saturating_add(line.quantity);
            continue;
        }

        positions.insert(line.product_id, grouped.len());
        grouped.push(AggregateLine {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            image: line.image.clone(),
            quantity: line.quantity,
        });
    }

    grouped
}
