//! Storefront demo binary
//!
//! Restores the persisted cart and theme, shops a little, places an order,
//! and books a repair, printing state along the way.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use storefront::booking::{BookingAction, BookingField, DeviceType, format_slot};
use storefront::cart::{CartAction, ProductId};
use storefront::checkout::CheckoutAction;
use storefront::forms::{CheckoutField, PaymentMethod};
use storefront::storage::FileStorage;
use storefront::theme::ThemeAction;
use storefront::{
    AppAction, AppEnvironment, AppState, Catalog, ProductFilter, RandomIds, ServiceCatalog,
    SortOrder, StorefrontConfig, StorefrontReducer,
};
use storefront_core::environment::SystemClock;
use storefront_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = StorefrontConfig::from_env().context("loading configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage = Arc::new(
        FileStorage::open(&config.data_file)
            .with_context(|| format!("opening {}", config.data_file.display()))?,
    );
    let env = AppEnvironment::new(
        storage.clone(),
        Arc::new(SystemClock),
        Arc::new(RandomIds),
        &config,
    );
    let initial = AppState::restore(storage.as_ref(), config.prefers_dark);
    println!("=== Storefront ({} theme) ===", initial.theme.theme);
    println!(
        "Restored cart: {} item(s), {}",
        initial.cart.item_count(),
        initial.cart.total
    );

    let store = Store::new(initial, StorefrontReducer::new(), env);
    let catalog = Catalog::demo();

    // Browse
    let filter = ProductFilter {
        category: Some("Audio".to_string()),
        ..ProductFilter::default()
    };
    println!("\nActive filters: {}", filter.active_labels().join(", "));
    for product in catalog.browse(&filter, SortOrder::PriceLowToHigh) {
        println!("  {:>3}  {:<24} {}", product.id, product.name, product.price);
    }

    // Shop
    for id in [4, 7, 7] {
        let product = catalog.product(ProductId::new(id))?.to_cart_product();
        store.send(AppAction::Cart(CartAction::AddItem { product })).await?;
    }
    store
        .send(AppAction::Cart(CartAction::DecrementQuantity { id: ProductId::new(7) }))
        .await?;
    let cart = store.state(|s| s.cart.clone()).await;
    println!("\nCart:");
    for item in &cart.items {
        println!("  {} x{}  {}", item.product.name, item.quantity, item.line_total());
    }
    println!("  Total: {}", cart.total);

    // Checkout
    for (field, value) in [
        (CheckoutField::FirstName, "Jane"),
        (CheckoutField::LastName, "Doe"),
        (CheckoutField::Email, "jane@example.com"),
        (CheckoutField::Address, "1 Main St"),
        (CheckoutField::City, "Springfield"),
        (CheckoutField::State, "IL"),
        (CheckoutField::ZipCode, "62701"),
    ] {
        store
            .send(AppAction::Checkout(CheckoutAction::UpdateField {
                field,
                value: value.to_string(),
            }))
            .await?;
    }
    store
        .send(AppAction::Checkout(CheckoutAction::SelectPaymentMethod(PaymentMethod::PayPal)))
        .await?;

    let timeout = config.checkout_delay + Duration::from_secs(5);
    let placed = store
        .send_and_wait_for(
            AppAction::PlaceOrder,
            |action| matches!(action, AppAction::Checkout(CheckoutAction::OrderPlaced { .. })),
            timeout,
        )
        .await;
    match placed {
        Ok(AppAction::Checkout(CheckoutAction::OrderPlaced { confirmation })) => {
            println!(
                "\nOrder {} placed for {}: subtotal {}, tax {}, total {}",
                confirmation.order_number,
                confirmation.customer,
                confirmation.summary.subtotal,
                confirmation.summary.tax,
                confirmation.summary.total
            );
        },
        Ok(_) => {},
        Err(error) => {
            let errors = store.state(|s| s.checkout.errors.clone()).await;
            for (field, message) in errors.iter() {
                println!("  {field}: {message}");
            }
            return Err(error).context("placing order");
        },
    }
    println!("Cart after order: {} item(s)", store.state(|s| s.cart.item_count()).await);

    // Book a repair
    let services = ServiceCatalog::demo();
    println!("\nLaptop repairs:");
    for service in services.search("", Some("Laptop")) {
        println!("  {:<32} from {} ({})", service.name, service.base_price, service.estimated_time);
    }
    let slot = store
        .state(|s| s.booking.time_slots.first().copied())
        .await
        .context("no time slots")?;
    let mut actions = vec![
        BookingField::DeviceType(Some(DeviceType::Laptop)),
        BookingField::Brand("Dell".to_string()),
        BookingField::Model("XPS 13".to_string()),
    ]
    .into_iter()
    .map(BookingAction::UpdateField)
    .collect::<Vec<_>>();
    actions.push(BookingAction::Next);
    for action in actions {
        store.send(AppAction::Booking(action)).await?;
    }

    let issue = store
        .state(|s| s.booking.issue_options.first().copied())
        .await
        .context("no issue options")?;
    for field in [
        BookingField::IssueType(issue.to_string()),
        BookingField::IssueDescription("Screen flickers when opened past 90 degrees".to_string()),
    ] {
        store.send(AppAction::Booking(BookingAction::UpdateField(field))).await?;
    }
    store.send(AppAction::Booking(BookingAction::Next)).await?;

    let date = store
        .state(|s| s.booking.available_dates.first().copied())
        .await
        .context("no available dates")?;
    for field in [
        BookingField::FirstName("Jane".to_string()),
        BookingField::LastName("Doe".to_string()),
        BookingField::Email("jane@example.com".to_string()),
        BookingField::Phone("555-0100".to_string()),
        BookingField::Date(Some(date)),
        BookingField::Time(Some(slot)),
        BookingField::TermsAccepted(true),
    ] {
        store.send(AppAction::Booking(BookingAction::UpdateField(field))).await?;
    }
    store.send(AppAction::Booking(BookingAction::Next)).await?;

    if let Some(booking) = store.state(|s| s.booking.confirmation.clone()).await {
        println!("\nRepair booked:");
        println!("  Device:  {}", booking.device);
        println!("  Issue:   {}", booking.issue);
        println!("  Date:    {}", booking.date);
        println!("  Time:    {} (first slot {})", booking.time, format_slot(slot));
        println!("  Name:    {}", booking.name);
        println!("  Contact: {}", booking.email);
    }

    store.send(AppAction::Theme(ThemeAction::Toggle)).await?;
    println!("\nTheme is now {}", store.state(|s| s.theme.theme).await);

    store.shutdown(Duration::from_secs(5)).await?;
    Ok(())
}
