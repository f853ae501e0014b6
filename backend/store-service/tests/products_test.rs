mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::{
    create_collection, create_order, create_product, create_review, create_user, dec, setup,
};
use store_service::db::{collection_repo, order_repo, review_repo};
use store_service::models::OrderStatus;

#[actix_web::test]
async fn product_list_and_detail_are_public() {
    let ctx = setup().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(create_product(&ctx.pool, &format!("product{}", i), "10.00").await.id);
    }
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/v1/products").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let listed: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, ids);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/products/{}", ids[2]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], ids[2]);
    assert_eq!(body["price"], "10.00");
}

#[actix_web::test]
async fn missing_product_is_404() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::get().uri("/api/v1/products/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_staff_create_products() {
    let ctx = setup().await;
    let customer = create_user(&ctx.pool, "customer", false).await;
    let admin = create_user(&ctx.pool, "admin", true).await;
    let app = test::init_service(common::create_app(ctx.state())).await;
    let payload = json!({"name": "Kettle", "description": "Steel kettle", "price": "5000.00"});

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .insert_header(customer.auth())
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/products")
        .insert_header(admin.auth())
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Kettle");
    assert_eq!(body["price"], "5000.00");
}

#[actix_web::test]
async fn staff_update_and_delete_products() {
    let ctx = setup().await;
    let admin = create_user(&ctx.pool, "admin", true).await;
    let customer = create_user(&ctx.pool, "customer", false).await;
    let product = create_product(&ctx.pool, "Mug", "4.50").await;
    let app = test::init_service(common::create_app(ctx.state())).await;
    let url = format!("/api/v1/products/{}", product.id);
    let payload = json!({"name": "Big mug", "description": "Holds more", "price": 6.25});

    let req = test::TestRequest::put()
        .uri(&url)
        .insert_header(customer.auth())
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&url)
        .insert_header(admin.auth())
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Big mug");
    assert_eq!(body["price"], "6.25");

    let req = test::TestRequest::patch()
        .uri(&url)
        .insert_header(admin.auth())
        .set_json(&payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );

    let req = test::TestRequest::delete()
        .uri(&url)
        .insert_header(admin.auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&url).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_prices_are_rejected() {
    let ctx = setup().await;
    let admin = create_user(&ctx.pool, "admin", true).await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    for price in [json!("-1.00"), json!("1.999"), json!("100000000.00"), json!("cheap")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/products")
            .insert_header(admin.auth())
            .set_json(json!({"name": "Bad", "description": "price", "price": price.clone()}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "price {}", price);
    }
}

#[actix_web::test]
async fn product_filters_by_price_and_name() {
    let ctx = setup().await;
    create_product(&ctx.pool, "Green Tea", "3.00").await;
    create_product(&ctx.pool, "Black tea", "5.00").await;
    create_product(&ctx.pool, "Coffee", "8.00").await;
    create_product(&ctx.pool, "100% Juice", "4.00").await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let names = |body: Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    };

    let req = test::TestRequest::get()
        .uri("/api/v1/products?price__lte=5.00")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    for product in body.as_array().unwrap() {
        let price = dec(product["price"].as_str().unwrap());
        assert!(price <= dec("5.00"));
    }
    assert_eq!(body.as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?name__icontains=TEA")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["Green Tea", "Black tea"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?name__iexact=coffee")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["Coffee"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?name__icontains=%25")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["100% Juice"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?price=5.00")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["Black tea"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?price__gte=4.00")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["Black tea", "Coffee", "100% Juice"]);

    // exact name match is case-sensitive
    let req = test::TestRequest::get()
        .uri("/api/v1/products?name=Black%20tea")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["Black tea"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?name=black%20tea")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(names(body).is_empty());

    let req = test::TestRequest::get()
        .uri("/api/v1/products?description__icontains=COFFEE%20DESC")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(body), vec!["Coffee"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/products?price__gte=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_token_is_rejected_even_on_public_routes() {
    let ctx = setup().await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/products")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn deleting_a_product_cascades_to_dependents() {
    let ctx = setup().await;
    let admin = create_user(&ctx.pool, "admin", true).await;
    let buyer = create_user(&ctx.pool, "buyer", false).await;
    let doomed = create_product(&ctx.pool, "Doomed", "3.00").await;
    let other = create_product(&ctx.pool, "Other", "4.00").await;
    let review = create_review(&ctx.pool, buyer.id(), doomed.id, 2).await;
    let collection = create_collection(&ctx.pool, "Mixed", &[doomed.id, other.id]).await;
    let order_id = create_order(
        &ctx.pool,
        buyer.id(),
        OrderStatus::New,
        "10.00",
        &[(doomed.id, 2), (other.id, 1)],
    )
    .await;
    let app = test::init_service(common::create_app(ctx.state())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/products/{}", doomed.id))
        .insert_header(admin.auth())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    assert!(review_repo::find_review(&ctx.pool, review.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        collection_repo::member_ids(&ctx.pool, collection.id)
            .await
            .unwrap(),
        vec![other.id]
    );
    let positions = order_repo::list_positions(&ctx.pool, &[order_id])
        .await
        .unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].product_id, other.id);

    // the order and collection themselves survive
    assert!(order_repo::find_order(&ctx.pool, order_id)
        .await
        .unwrap()
        .is_some());
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/product-collections/{}", collection.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
}
