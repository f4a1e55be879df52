//! Terminal rendering.
//!
//! Command results go to stdout; notices about problems go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Write;

use francine_storefront::models::{Cart, Product, SessionUser, UiMode};
use francine_storefront::notice::Notice;
use francine_storefront::services::Receipt;

pub fn notice(notice: &Notice) {
    println!("{notice}");
}

pub fn warn(message: &str) {
    eprintln!("warning: {message}");
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

pub fn prompt(message: &str) {
    eprint!("{message}");
    let _ = std::io::stderr().flush();
}

pub fn products(products: &[Product]) {
    for product in products {
        println!(
            "{:>4}  {:<40} {:>12}",
            product.id,
            product.name,
            product.price.display()
        );
    }
}

/// Listing for admins: full IDs and descriptions.
pub fn admin_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products");
        return;
    }
    for product in products {
        println!("{}  {}  {}", product.id, product.name, product.price.display());
        if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    {description}");
        }
    }
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        println!(
            "{:>4}  {:<40} {:>3} x {:>12} = {:>12}",
            item.id,
            item.name,
            item.quantity,
            item.unit_price.display(),
            item.line_total().display()
        );
    }
    cart_summary(cart);
}

pub fn cart_summary(cart: &Cart) {
    println!("Items: {}  Total: {}", cart.count(), cart.total().display());
}

pub fn receipt(receipt: &Receipt) {
    println!("Items: {}  Charged: {}", receipt.count, receipt.total.display());
}

pub fn session(user: Option<&SessionUser>, mode: UiMode) {
    match user {
        Some(user) => {
            let surface = match mode {
                UiMode::Admin => "admin",
                UiMode::Customer => "customer",
            };
            match user.email() {
                Some(email) => println!("{} <{email}> ({surface})", user.name),
                None => println!("{} ({surface})", user.name),
            }
        }
        None => println!("Not logged in"),
    }
}
