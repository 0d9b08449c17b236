//! Terminal rendering of carts, quotations and dealer progress.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

use solarstore::{
    assets::{AssetFolder, asset_url},
    cart::CartView,
    dealers::{Section, StatusAction},
    pagination::Page,
    quotation::Quotation,
};

use crate::services::RegistrationProgress;

/// Write the editable cart lines followed by the order summary.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_cart(out: &mut impl io::Write, cart: &CartView, asset_base: &str) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    let mut lines = Builder::default();
    lines.push_record(["#", "Product", "Qty", "Image"]);

    for (idx, line) in cart.lines.iter().enumerate() {
        let image = if line.image.is_empty() {
            String::new()
        } else {
            asset_url(asset_base, AssetFolder::Products, &line.image)
        };

        lines.push_record([
            (idx + 1).to_string(),
            format!("{} ({})", line.product_name, line.product_id),
            line.quantity.to_string(),
            image,
        ]);
    }

    write_table(out, lines, &[2])?;

    let mut summary = Builder::default();
    summary.push_record(["Order Summary", "Qty"]);

    for line in &cart.aggregate {
        summary.push_record([line.product_name.clone(), line.quantity.to_string()]);
    }

    summary.push_record(["Total".to_string(), cart.total_quantity().to_string()]);

    write_table(out, summary, &[1])?;

    if let Some(expires) = cart.expires {
        writeln!(out, "Cart expires {expires}")?;
    }

    Ok(())
}

/// Write one page of quotations.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_quotations(out: &mut impl io::Write, page: &Page<'_, Quotation>) -> io::Result<()> {
    let mut builder = Builder::default();
    builder.push_record(["Id", "Customer", "Email", "Products", "Status"]);

    for quotation in page.items {
        let products = quotation
            .products
            .iter()
            .map(|p| format!("{} x{}", p.name, p.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        builder.push_record([
            quotation.id.to_string(),
            quotation.customer_name.clone(),
            quotation.customer_email.clone(),
            products,
            quotation.status.to_string(),
        ]);
    }

    write_table(out, builder, &[0])?;

    writeln!(
        out,
        "Page {} of {} ({} quotations)",
        page.number, page.total_pages, page.total_items
    )
}

/// Write a dealer's registration progress.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_progress(
    out: &mut impl io::Write,
    progress: &RegistrationProgress,
    actions: &[StatusAction],
) -> io::Result<()> {
    writeln!(
        out,
        "{} (dealer {}): {}",
        progress.dealer.display_name(),
        progress.dealer.id,
        progress.dealer.reg_status
    )?;

    let mut builder = Builder::default();
    builder.push_record(["Section", "Complete"]);

    for section in Section::ALL {
        let mark = if progress.sections.is_complete(section) {
            "yes"
        } else {
            "no"
        };

        builder.push_record([section.title(), mark]);
    }

    write_table(out, builder, &[])?;

    writeln!(
        out,
        "{} {}%",
        progress_bar(progress.sections.progress_percent()),
        progress.sections.progress_percent()
    )?;

    if !actions.is_empty() {
        let labels: Vec<&str> = actions.iter().map(|action| action.label()).collect();

        writeln!(out, "Actions: {}", labels.join(", "))?;
    }

    Ok(())
}

fn progress_bar(percent: u8) -> String {
    const WIDTH: usize = 30;

    let filled = usize::from(percent.min(100)) * WIDTH / 100;

    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

fn write_table(out: &mut impl io::Write, builder: Builder, numeric: &[usize]) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);

    for &column in numeric {
        table.modify(Columns::new(column..=column), Alignment::right());
    }

    writeln!(out, "{table}")
}
