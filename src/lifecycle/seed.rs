//! Default menu and discount codes for an empty store.

use crate::clients::{DiscountClient, ProductClient};
use crate::error::StorefrontError;
use crate::model::{DiscountCreate, ProductCreate, Rupees};
use tracing::info;

fn dish(name: &str, price: u64, category: &str, description: &str, photo: &str, stock: u32) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        price: Rupees(price),
        category: category.to_string(),
        description: description.to_string(),
        image: Some(format!(
            "https://images.unsplash.com/photo-{}?w=300&h=200&fit=crop",
            photo
        )),
        stock,
    }
}

pub fn default_menu() -> Vec<ProductCreate> {
    vec![
        dish(
            "Chicken Biryani",
            299,
            "biryani",
            "Aromatic basmati rice with tender chicken pieces",
            "1563379091339-03246963d96c",
            50,
        ),
        dish(
            "Paneer Makhani",
            229,
            "curry",
            "Rich and creamy paneer curry",
            "1631452180519-c014fe946bc7",
            30,
        ),
        dish(
            "Margherita Pizza",
            249,
            "pizza",
            "Classic pizza with fresh tomato sauce and mozzarella",
            "1604382354936-07c5d9983bd3",
            25,
        ),
    ]
}

pub fn default_discount_codes() -> Vec<DiscountCreate> {
    [
        ("WOWGANDHI", 30, "Special Gandhi discount", true),
        ("NEWUSER", 10, "New user discount", true),
        ("SAVE20", 20, "Save ₹20 on your order", true),
        ("SAVE50", 50, "Big savings discount", false),
    ]
    .into_iter()
    .map(|(code, amount, description, active)| DiscountCreate {
        code: code.to_string(),
        amount: Rupees(amount),
        description: description.to_string(),
        active,
    })
    .collect()
}

pub async fn seed_menu(products: &ProductClient) -> Result<(), StorefrontError> {
    let menu = default_menu();
    let count = menu.len();
    for dish in menu {
        products.add_product(dish).await?;
    }
    info!(count, "Default menu seeded");
    Ok(())
}

pub async fn seed_discount_codes(discounts: &DiscountClient) -> Result<(), StorefrontError> {
    let codes = default_discount_codes();
    let count = codes.len();
    for code in codes {
        discounts.add_code(code).await?;
    }
    info!(count, "Default discount codes seeded");
    Ok(())
}
