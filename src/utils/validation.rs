//! Input checks shared by the auth, catalog and lending handlers.

use crate::{
    error::{AppError, Result},
    models::{ImageChange, Product, ProductChanges, Transaction, UpdateProductRequest},
};

const MIN_PASSWORD_LEN: usize = 6;
const MAX_NAME_LEN: usize = 100;
const MAX_PRODUCT_NAME_LEN: usize = 200;
const MAX_CLASS_LEN: usize = 50;

pub fn validate_email(email: &str) -> Result<()> {
    let trimmed = email.trim();

    if trimmed.is_empty() || trimmed.len() > 254 {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::BadRequest("Invalid email address".to_string())),
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(())
}

pub fn validate_class(class: Option<&str>) -> Result<()> {
    match class {
        Some(class) if class.chars().count() > MAX_CLASS_LEN => Err(AppError::BadRequest(
            format!("Class must be at most {} characters", MAX_CLASS_LEN),
        )),
        _ => Ok(()),
    }
}

pub fn validate_product_name(name: &str) -> Result<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }

    if trimmed.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Product name must be at most {} characters",
            MAX_PRODUCT_NAME_LEN
        )));
    }

    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }
    Ok(())
}

pub fn product_changes(payload: UpdateProductRequest) -> Result<ProductChanges> {
    let name = payload.name.map(|n| n.trim().to_string());
    if let Some(ref name) = name {
        validate_product_name(name)?;
    }

    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
    }

    let image = match payload.image_url {
        None => ImageChange::Keep,
        Some(url) => match url.trim() {
            "" => ImageChange::Remove,
            trimmed => ImageChange::Set(trimmed.to_string()),
        },
    };

    if name.is_none() && payload.stock.is_none() && image == ImageChange::Keep {
        return Err(AppError::BadRequest(
            "At least one field (name, stock or image_url) must be provided".to_string(),
        ));
    }

    Ok(ProductChanges {
        name,
        stock: payload.stock,
        image,
    })
}

/// A borrow needs a positive quantity of a live product with enough stock.
pub fn validate_borrow(product: &Product, quantity: i32) -> Result<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    if product.archived {
        return Err(AppError::BadRequest(format!(
            "{} is no longer available",
            product.name
        )));
    }

    if product.stock <= 0 {
        return Err(AppError::BadRequest(format!("{} is out of stock", product.name)));
    }

    if quantity > product.stock {
        return Err(AppError::BadRequest(format!(
            "Only {} of {} available",
            product.stock, product.name
        )));
    }

    Ok(())
}

pub fn validate_return(transaction: &Transaction, quantity: i32) -> Result<()> {
    let outstanding = transaction.outstanding();

    if outstanding <= 0 {
        return Err(AppError::BadRequest(
            "This item has already been fully returned".to_string(),
        ));
    }

    if quantity <= 0 || quantity > outstanding {
        return Err(AppError::BadRequest(format!(
            "Quantity must be between 1 and {}",
            outstanding
        )));
    }

    Ok(())
}

/// Maps an accepted image content type to the object key extension.
pub fn image_extension(content_type: &str) -> Result<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        other => Err(AppError::BadRequest(format!(
            "Unsupported image type: {}",
            other
        ))),
    }
}

/// Trims optional free text, mapping blank input to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(stock: i32, archived: bool) -> Product {
        Product {
            id: 1,
            name: "Batik shirt".to_string(),
            image_url: None,
            stock,
            archived,
            created_at: Utc::now(),
        }
    }

    fn transaction(quantity: i32, returned_quantity: i32) -> Transaction {
        Transaction {
            id: 10,
            user_id: 2,
            product_id: 1,
            quantity,
            returned_quantity,
            borrower_name: "Budi".to_string(),
            class: None,
            reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn email_checks() {
        assert!(validate_email("budi@school.id").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("budi").is_err());
        assert!(validate_email("@school.id").is_err());
        assert!(validate_email("budi@localhost").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Budi Santoso").is_ok());
        assert!(validate_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn class_label_length_is_bounded() {
        assert!(validate_class(None).is_ok());
        assert!(validate_class(Some("XI IPA 2")).is_ok());
        assert!(validate_class(Some(&"y".repeat(50))).is_ok());

        let err = validate_class(Some(&"y".repeat(60))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn borrow_within_stock_is_accepted() {
        assert!(validate_borrow(&product(5, false), 1).is_ok());
        assert!(validate_borrow(&product(5, false), 5).is_ok());
    }

    #[test]
    fn borrow_rejects_bad_quantity_and_unavailable_products() {
        assert!(validate_borrow(&product(5, false), 0).is_err());
        assert!(validate_borrow(&product(5, false), -2).is_err());
        assert!(validate_borrow(&product(5, false), 6).is_err());
        assert!(validate_borrow(&product(0, false), 1).is_err());
        assert!(validate_borrow(&product(5, true), 1).is_err());
    }

    #[test]
    fn return_must_fit_outstanding_quantity() {
        let tx = transaction(5, 2);
        assert!(validate_return(&tx, 1).is_ok());
        assert!(validate_return(&tx, 3).is_ok());
        assert!(validate_return(&tx, 4).is_err());
        assert!(validate_return(&tx, 0).is_err());
        assert!(validate_return(&tx, -1).is_err());
    }

    #[test]
    fn return_error_names_the_allowed_range() {
        let err = validate_return(&transaction(4, 1), 9).unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Quantity must be between 1 and 3"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn fully_returned_transaction_accepts_nothing() {
        assert!(validate_return(&transaction(3, 3), 1).is_err());
    }

    fn update(
        name: Option<&str>,
        stock: Option<i32>,
        image_url: Option<&str>,
    ) -> UpdateProductRequest {
        UpdateProductRequest {
            name: name.map(str::to_string),
            stock,
            image_url: image_url.map(str::to_string),
        }
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(product_changes(update(None, None, None)).is_err());
    }

    #[test]
    fn blank_image_url_clears_the_image() {
        let changes = product_changes(update(None, None, Some("   "))).unwrap();
        assert_eq!(changes.image, ImageChange::Remove);
        assert_eq!(changes.name, None);
    }

    #[test]
    fn update_fields_are_trimmed_and_checked() {
        let changes = product_changes(update(
            Some("  Kebaya  "),
            Some(4),
            Some(" https://cdn.example.com/a.png "),
        ))
        .unwrap();

        assert_eq!(changes.name.as_deref(), Some("Kebaya"));
        assert_eq!(changes.stock, Some(4));
        assert_eq!(
            changes.image,
            ImageChange::Set("https://cdn.example.com/a.png".to_string())
        );

        assert!(product_changes(update(Some("   "), None, None)).is_err());
        assert!(product_changes(update(None, Some(-1), None)).is_err());
    }

    #[test]
    fn image_types() {
        assert_eq!(image_extension("image/jpeg").unwrap(), "jpg");
        assert_eq!(image_extension("image/webp").unwrap(), "webp");
        assert!(image_extension("application/pdf").is_err());
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" XI IPA ".to_string())),
            Some("XI IPA".to_string())
        );
        assert_eq!(normalize_optional(None), None);
    }
}
