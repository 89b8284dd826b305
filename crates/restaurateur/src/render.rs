//! Plain-text tables for the terminal.

use foodcart_core::dashboard::{OrderInfo, ProductAvailability};
use foodcart_core::models::format_price;

fn distance_label(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) => format!("{km:.2} km"),
        None => "distance unknown".to_string(),
    }
}

/// Restaurant column of the orders board.
fn restaurants_cell(order: &OrderInfo) -> String {
    if let Some(assigned) = &order.assigned {
        return format!(
            "Cooking at {} ({})",
            assigned.name,
            distance_label(assigned.distance_km)
        );
    }
    if order.geocode_error {
        return "Address not found".to_string();
    }
    if order.candidates.is_empty() {
        return "No restaurant can cook this order".to_string();
    }
    order
        .candidates
        .iter()
        .map(|candidate| format!("{} - {:.2} km", candidate.name, candidate.distance_km))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn orders_table(orders: &[OrderInfo]) -> String {
    let mut out = String::new();
    if orders.is_empty() {
        out.push_str("No pending orders\n");
        return out;
    }
    for order in orders {
        out.push_str(&format!(
            "#{:<5} {:<12} {:<9} {:>10}  {} {}  {}\n",
            order.id,
            order.status.to_string(),
            order.payment_method.to_string(),
            format_price(order.total_price),
            order.customer,
            order.phonenumber,
            order.address,
        ));
        if !order.comment.is_empty() {
            out.push_str(&format!("       comment: {}\n", order.comment));
        }
        out.push_str(&format!("       {}\n", restaurants_cell(order)));
    }
    out
}

pub fn availability_table(availability: &ProductAvailability) -> String {
    let mut out = String::new();
    let header: Vec<&str> = availability
        .restaurants
        .iter()
        .map(|restaurant| restaurant.name.as_str())
        .collect();
    out.push_str(&format!("{:<30} {}\n", "Product", header.join(" | ")));
    for row in &availability.rows {
        let flags: Vec<String> = row
            .availability
            .iter()
            .zip(&header)
            .map(|(available, name)| {
                let mark = if *available { "yes" } else { "no" };
                format!("{mark:^width$}", width = name.chars().count())
            })
            .collect();
        out.push_str(&format!("{:<30} {}\n", row.product.name, flags.join(" | ")));
    }
    out
}
