use anyhow::Context;

use hamperdesk_app::config::AppConfig;
use hamperdesk_app::feedback::{Notifier, Severity, TracingNotifier};
use hamperdesk_app::open_engine;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    hamperdesk_observability::init_with(&config.log);

    let mut engine = open_engine(&config)
        .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;

    tracing::info!(
        data_dir = %config.data_dir.display(),
        store = ?config.store,
        products = engine.products().len(),
        hampers = engine.hampers().len(),
        customers = engine.customers().len(),
        suppliers = engine.suppliers().len(),
        orders = engine.orders().len(),
        quotes = engine.quotes().len(),
        invoices = engine.invoices().len(),
        "hamperdesk ready"
    );

    let notifier = TracingNotifier;

    for product in engine.low_stock_products(config.low_stock_threshold) {
        notifier.notify(
            &format!("Low stock: {} ({} {} left)", product.name, product.stock, product.unit),
            Severity::Warning,
        );
    }

    let today = engine.today();
    let expired = engine.expire_quotes(today);
    if !expired.is_empty() {
        notifier.notify(&format!("{} quote(s) expired", expired.len()), Severity::Info);
    }
    let overdue = engine.mark_overdue_invoices(today);
    if !overdue.is_empty() {
        notifier.notify(&format!("{} invoice(s) now overdue", overdue.len()), Severity::Warning);
    }

    tracing::info!(
        next_order = %engine.next_order_number(),
        next_quote = %engine.next_quote_number(),
        next_invoice = %engine.next_invoice_number(),
        "numbering"
    );
    Ok(())
}
