//! End-to-end bookshop sessions across the catalog, order and consumer APIs.

use bookshop_core::{BookId, CartId, ConsumerId, Entity, OrderId, ShopError};
use bookshop_events::{Event, EventBus, EventEnvelope, InMemoryEventBus};
use bookshop_inventory::{Book, BookDetails};
use bookshop_sales::{Order, OrderLine, OrderStatus, RefundOption};
use bookshop_shop::{Consumer, Shop, ShopConfig, ShopEvent};

fn sapkowski(shop: &mut Shop, name: &str, year: i32, price: u64, stock: u64) -> Book {
    Book::new(
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
    )
}

#[test]
fn stock_survives_rejected_orders_and_refunds() {
    bookshop_observability::init();

    let mut shop = Shop::new();
    let last_wish = sapkowski(&mut shop, "The Last Wish", 1993, 3099, 100);
    let a = last_wish.id();
    shop.add_book(last_wish).unwrap();

    let accepted = shop.next_order_id();
    shop.make_order(Order::new(accepted, [OrderLine::new(a, 10)]))
        .unwrap();
    assert_eq!(shop.book_info(a).unwrap().stock(), 90);

    let too_many = shop.next_order_id();
    let err = shop
        .make_order(Order::new(too_many, [OrderLine::new(a, 500)]))
        .unwrap_err();
    assert_eq!(err, ShopError::insufficient_stock(a, 500, 90));
    assert_eq!(shop.book_info(a).unwrap().stock(), 90);

    assert_eq!(
        shop.refund_order(too_many, RefundOption::SelfReturn),
        Err(ShopError::UnknownOrder(too_many))
    );
    assert_eq!(shop.book_info(a).unwrap().stock(), 90);
}

#[test]
fn consumer_session_against_shared_shop() {
    bookshop_observability::init();

    let mut shop = Shop::new();
    let last_wish = sapkowski(&mut shop, "The Last Wish", 1993, 3099, 100);
    let sword = sapkowski(&mut shop, "Sword of Destiny", 1992, 3599, 50);
    shop.add_book(last_wish.clone()).unwrap();
    shop.add_book(sword.clone()).unwrap();
    // Restock under the same id.
    shop.add_book(sword.clone()).unwrap();
    assert_eq!(shop.book_info(sword.id()).unwrap().stock(), 100);

    let cart_id = shop.next_cart_id();
    let mut consumer = Consumer::new(ConsumerId::new(12345), cart_id);
    assert_eq!(consumer.id(), ConsumerId::new(12345));

    consumer.make_cart(CartId::new(1111));
    consumer.add_book(&shop, &last_wish).unwrap();
    consumer.add_book(&shop, &sword).unwrap();

    let unlisted = Book::new(
        BookId::new(100500),
        last_wish.details().clone(),
        1,
    );
    assert!(consumer.add_book(&shop, &unlisted).is_err());
    assert_eq!(consumer.books_in_cart().len(), 2);

    consumer.make_order(&mut shop, OrderId::new(1234567)).unwrap();
    assert!(consumer.books_in_cart().is_empty());

    let first = consumer.orders()[0];
    assert_eq!(shop.order(first).unwrap().lines().len(), 2);

    shop.order_mut(first)
        .unwrap()
        .change_status(OrderStatus::Done);
    assert_eq!(consumer.status(&shop, first), OrderStatus::Done);
    assert_eq!(consumer.status(&shop, OrderId::new(0)), OrderStatus::NotCreated);

    consumer.add_book(&shop, &sword).unwrap();
    let second = OrderId::new(54321);
    consumer.make_order(&mut shop, second).unwrap();
    assert_eq!(consumer.orders(), &[first, second]);

    consumer
        .refund(&mut shop, second, RefundOption::SelfReturn)
        .unwrap();
    assert_eq!(consumer.status(&shop, second), OrderStatus::Refunded);
    assert_eq!(shop.book_info(sword.id()).unwrap().stock(), 99);
}

#[test]
fn published_events_describe_the_session() {
    let bus = InMemoryEventBus::<EventEnvelope<ShopEvent>>::new();
    let subscription = bus.subscribe();

    let mut shop = Shop::with_config(ShopConfig::default());
    let book = sapkowski(&mut shop, "Blood of Elves", 1994, 2999, 3);
    let book_id = book.id();
    shop.add_book(book).unwrap();

    let mut consumer = Consumer::new(ConsumerId::new(1), shop.next_cart_id());
    let listed = shop.book_info(book_id).unwrap().clone();
    consumer.add_book(&shop, &listed).unwrap();
    let order_id = shop.next_order_id();
    consumer.make_order(&mut shop, order_id).unwrap();
    shop.deliver_order(order_id).unwrap();

    assert_eq!(shop.publish_events(&bus), Ok(3));

    let received: Vec<_> = subscription
        .drain()
        .into_iter()
        .map(EventEnvelope::into_payload)
        .collect();
    let types: Vec<_> = received.iter().map(Event::event_type).collect();
    assert_eq!(
        types,
        vec!["shop.book.stocked", "shop.order.placed", "shop.order.delivered"]
    );

    let json = serde_json::to_string(&received[1]).unwrap();
    assert!(json.contains("\"OrderPlaced\""));
}
