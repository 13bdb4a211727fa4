use anyhow::Result;
use chrono::Utc;
use contracts::domain::a007_sponsored_ad::aggregate::SponsoredAd;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a007_sponsored_ad")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub ad_product: String,
    pub payload_date: Date,
    pub campaign_id: String,
    pub campaign_name: Option<String>,
    pub ad_group_id: String,
    pub keyword_id: String,
    pub asin: String,
    pub impressions: i64,
    pub clicks: i64,
    pub cost: f64,
    pub sales: f64,
    pub orders: i64,
    pub units: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Upsert by `(account_id, asp_id, ad_product, payload_date, campaign_id,
/// ad_group_id, keyword_id, asin)`
pub async fn upsert(db: &DatabaseConnection, ad: &SponsoredAd) -> Result<bool> {
    let existing = Entity::find()
        .filter(Column::AccountId.eq(&ad.account_id))
        .filter(Column::AspId.eq(&ad.asp_id))
        .filter(Column::AdProduct.eq(ad.ad_product.code()))
        .filter(Column::PayloadDate.eq(ad.payload_date))
        .filter(Column::CampaignId.eq(&ad.campaign_id))
        .filter(Column::AdGroupId.eq(&ad.ad_group_id))
        .filter(Column::KeywordId.eq(&ad.keyword_id))
        .filter(Column::Asin.eq(&ad.asin))
        .one(db)
        .await?;

    let (id, is_new) = match existing {
        Some(m) => (m.id, false),
        None => (Uuid::new_v4().to_string(), true),
    };
    let active = ActiveModel {
        id: Set(id),
        account_id: Set(ad.account_id.clone()),
        asp_id: Set(ad.asp_id.clone()),
        ad_product: Set(ad.ad_product.code().to_string()),
        payload_date: Set(ad.payload_date),
        campaign_id: Set(ad.campaign_id.clone()),
        campaign_name: Set(ad.campaign_name.clone()),
        ad_group_id: Set(ad.ad_group_id.clone()),
        keyword_id: Set(ad.keyword_id.clone()),
        asin: Set(ad.asin.clone()),
        impressions: Set(ad.impressions),
        clicks: Set(ad.clicks),
        cost: Set(ad.cost),
        sales: Set(ad.sales),
        orders: Set(ad.orders),
        units: Set(ad.units),
        updated_at: Set(Utc::now()),
    };
    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(is_new)
}

pub async fn count(db: &DatabaseConnection, account_id: &str) -> Result<u64> {
    Ok(Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .count(db)
        .await?)
}
