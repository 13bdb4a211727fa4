use contracts::domain::a007_sponsored_ad::aggregate::SponsoredAd;
use sea_orm::DatabaseConnection;

use super::repository;

/// Returns `None` when the row is invalid and was skipped
pub async fn store(db: &DatabaseConnection, ad: &SponsoredAd) -> anyhow::Result<Option<bool>> {
    if let Err(e) = ad.validate() {
        tracing::warn!("Skipping sponsored ad row: {}", e);
        return Ok(None);
    }
    Ok(Some(repository::upsert(db, ad).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::memory_db;
    use chrono::NaiveDate;
    use contracts::enums::report_type::AdProduct;

    fn ad(keyword_id: &str, cost: f64) -> SponsoredAd {
        SponsoredAd {
            account_id: "acc-1".into(),
            asp_id: "A1SELLER".into(),
            ad_product: AdProduct::SponsoredProducts,
            payload_date: NaiveDate::from_ymd_opt(2023, 6, 5).unwrap(),
            campaign_id: "C1".into(),
            campaign_name: Some("Summer".into()),
            ad_group_id: "G1".into(),
            keyword_id: keyword_id.into(),
            asin: "B001".into(),
            impressions: 100,
            clicks: 4,
            cost,
            sales: 20.0,
            orders: 1,
            units: 1,
        }
    }

    #[tokio::test]
    async fn test_natural_key_includes_keyword() {
        let db = memory_db().await;
        assert_eq!(store(&db, &ad("K1", 1.0)).await.unwrap(), Some(true));
        assert_eq!(store(&db, &ad("K2", 1.0)).await.unwrap(), Some(true));
        assert_eq!(store(&db, &ad("K1", 2.5)).await.unwrap(), Some(false));
        assert_eq!(repository::count(&db, "acc-1").await.unwrap(), 2);
    }
}
