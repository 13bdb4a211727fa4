use contracts::domain::a011_product::aggregate::{Product, ProductDto};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::ApiError;

/// Create or update a catalog entry of the account
pub async fn save(
    db: &DatabaseConnection,
    account_id: &str,
    dto: ProductDto,
) -> Result<Product, ApiError> {
    let product = Product {
        account_id: account_id.to_string(),
        asp_id: dto.asp_id.trim().to_string(),
        asin: dto.asin.trim().to_string(),
        sku: dto.sku,
        title: dto.title,
        brand: dto.brand,
        category: dto.category,
        unit_cost: dto.unit_cost,
    };
    if product.asp_id.is_empty() {
        return Err(ApiError::field("asp_id", "asp_id is required"));
    }
    product
        .validate()
        .map_err(|e| ApiError::field("product", e))?;

    repository::upsert(db, &product).await?;
    Ok(product)
}

pub async fn list(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: Option<&str>,
) -> Result<Vec<Product>, ApiError> {
    Ok(repository::list(db, account_id, asp_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::memory_db;

    fn dto(unit_cost: f64) -> ProductDto {
        ProductDto {
            asp_id: "A1SELLER".into(),
            asin: "B001".into(),
            sku: Some("SKU-1".into()),
            title: Some("Kettle".into()),
            brand: Some("Acme".into()),
            category: Some("Kitchen".into()),
            unit_cost,
        }
    }

    #[tokio::test]
    async fn test_save_updates_unit_cost() {
        let db = memory_db().await;
        save(&db, "acc-1", dto(4.0)).await.unwrap();
        save(&db, "acc-1", dto(6.5)).await.unwrap();

        let products = list(&db, "acc-1", None).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].unit_cost, 6.5);
        assert!(list(&db, "acc-2", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_cost_rejected() {
        let db = memory_db().await;
        let err = save(&db, "acc-1", dto(-1.0)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
