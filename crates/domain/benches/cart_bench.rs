use std::sync::Arc;

use cart_store::InMemoryCartStore;
use common::{CallContext, Money, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    CartService, InMemoryCatalogClient, InMemoryDiscountClient, InMemoryInventoryClient,
    InMemoryTaxClient,
};

fn service() -> CartService<InMemoryCartStore> {
    let catalog = InMemoryCatalogClient::new();
    let inventory = InMemoryInventoryClient::new();
    catalog.insert_product("SKU-BENCH", "Benchmark Widget", 10.0, "");
    inventory.set_stock("SKU-BENCH", u32::MAX);

    CartService::new(
        InMemoryCartStore::new(),
        Arc::new(catalog),
        Arc::new(inventory),
        Arc::new(InMemoryDiscountClient::with_discount(Money::from_cents(10))),
        Arc::new(InMemoryTaxClient::with_tax(Money::from_cents(5))),
    )
}

fn bench_add_item(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = service();
    let ctx = CallContext::new("bench-user");
    let sku = ProductId::new("SKU-BENCH");

    c.bench_function("domain/add_item", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.add_item(&ctx, &sku, 1).await.unwrap();
            });
        });
    });
}

fn bench_get_cart_details(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = service();
    let ctx = CallContext::new("bench-user");
    let sku = ProductId::new("SKU-BENCH");
    rt.block_on(async {
        service.add_item(&ctx, &sku, 3).await.unwrap();
    });

    c.bench_function("domain/get_cart_details", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.get_cart_details(&ctx).await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_add_item, bench_get_cart_details);
criterion_main!(benches);
