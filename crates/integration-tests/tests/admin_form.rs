//! Admin form submissions.

use double_take_integration_tests::{TestApp, assert_see_other};

#[tokio::test]
async fn test_admin_page_renders_empty_form() {
    let app = TestApp::spawn().await;

    let page = app.get_text(&app.client, "/admin").await;

    assert!(page.contains("Admin Panel"));
    assert!(page.contains("4 products listed."));
    assert!(page.contains("action=\"/admin/products\""));
}

#[tokio::test]
async fn test_submit_appends_product() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/admin/products",
            &[
                ("title", "Suede Fringe Vest"),
                ("price", "62.50"),
                ("description", "Soft and worn in"),
                ("image", ""),
            ],
        )
        .await;
    assert_see_other(&response, "/");

    let home = app.home().await;
    assert!(home.contains("Product added to the catalog."));
    assert!(home.contains("Suede Fringe Vest"));
    assert!(home.contains("$62.50"));
    assert!(home.contains("Soft and worn in"));

    // The new product is listed after the seed stock and can be bought.
    assert!(home.find("High-waist Mom Jeans") < home.find("Suede Fringe Vest"));
    app.add_to_cart("p5").await;
    assert!(app.cart_count().await.contains(">1</span>"));

    let admin = app.get_text(&app.client, "/admin").await;
    assert!(admin.contains("5 products listed."));
}

#[tokio::test]
async fn test_catalog_is_shared_between_visitors() {
    let app = TestApp::spawn().await;
    app.post_form("/admin/products", &[("title", "Silk Scarf"), ("price", "15")])
        .await;

    let other = app.new_visitor();
    let page = app.get_text(&other, "/?q=silk").await;

    assert!(page.contains("Silk Scarf"));
    assert!(page.contains("$15.00"));
}

#[tokio::test]
async fn test_non_numeric_price_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/admin/products",
            &[("title", "Mystery Box"), ("price", "twenty")],
        )
        .await;

    assert_eq!(response.status(), 422);
    let page = response.text().await.expect("body");
    assert!(page.contains("Price must be a number"));
    assert!(page.contains("value=\"Mystery Box\""));
    assert!(page.contains("value=\"twenty\""));

    assert!(!app.home().await.contains("Mystery Box"));
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/admin/products", &[("title", "Refund Hat"), ("price", "-4")])
        .await;

    assert_eq!(response.status(), 422);
    assert!(
        response
            .text()
            .await
            .expect("body")
            .contains("Price cannot be negative")
    );
}

#[tokio::test]
async fn test_price_too_large_to_charge_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/admin/products",
            &[("title", "Gold Watch"), ("price", "100000000000000000000")],
        )
        .await;

    assert_eq!(response.status(), 422);
    assert!(
        response
            .text()
            .await
            .expect("body")
            .contains("Price is too large")
    );
    assert!(!app.home().await.contains("Gold Watch"));
}
