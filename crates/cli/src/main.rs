//! `bookshop` — runs a short scripted session against an in-memory shop and
//! prints the resulting catalog and event log as JSON.
//!
//! Environment:
//! - `RUST_LOG`: tracing filter (default `info`)
//! - `BOOKSHOP_LOG_FORMAT`: `json` for JSON logs, plain text otherwise
//! - `BOOKSHOP_REFUND_POLICY`, `BOOKSHOP_RECORD_REJECTED_ORDERS`: shop config

use anyhow::Context;

use bookshop_core::{ConsumerId, Entity};
use bookshop_inventory::{Book, BookDetails};
use bookshop_observability::LogFormat;
use bookshop_sales::RefundOption;
use bookshop_shop::{Consumer, Shop, ShopConfig};

fn main() -> anyhow::Result<()> {
    let format = LogFormat::from_env_value(std::env::var("BOOKSHOP_LOG_FORMAT").ok().as_deref());
    bookshop_observability::init_with(format, "info");

    let config = ShopConfig::from_env().context("reading shop configuration")?;
    tracing::info!(?config, "starting bookshop session");

    let mut shop = Shop::with_config(config);
    let catalog = [
        ("The Last Wish", 1993, 3099, 100),
        ("Sword of Destiny", 1992, 3599, 50),
    ];
    let mut books = Vec::with_capacity(catalog.len());
    for (name, year, price, stock) in catalog {
        let book = Book::new(
            shop.next_book_id(),
            BookDetails {
                name: name.to_string(),
                author: "Andrzej Sapkowski".to_string(),
                year,
                price,
                publisher: "SuperNova".to_string(),
                genre: "Adventure".to_string(),
            },
            stock,
        );
        shop.add_book(book.clone())
            .with_context(|| format!("stocking {name}"))?;
        books.push(book);
    }

    let mut consumer = Consumer::new(ConsumerId::new(1), shop.next_cart_id());
    for book in &books {
        consumer.add_book(&shop, book)?;
    }

    let first = shop.next_order_id();
    consumer.make_order(&mut shop, first)?;
    shop.deliver_order(first)?;

    consumer.add_book(&shop, &books[1])?;
    let second = shop.next_order_id();
    consumer.make_order(&mut shop, second)?;
    consumer.refund(&mut shop, second, RefundOption::Courier)?;

    for order_id in consumer.orders() {
        tracing::info!(
            consumer_id = %consumer.id(),
            order_id = %order_id,
            status = ?consumer.status(&shop, *order_id),
            "order status"
        );
    }

    let mut catalog: Vec<&Book> = shop.books().collect();
    catalog.sort_by_key(|book| book.id());
    println!("{}", serde_json::to_string_pretty(&catalog)?);

    let events = shop.take_events();
    println!("{}", serde_json::to_string_pretty(&events)?);

    Ok(())
}
