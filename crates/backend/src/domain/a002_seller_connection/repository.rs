use anyhow::Result;
use chrono::Utc;
use contracts::domain::a002_seller_connection::aggregate::SellerConnection;
use contracts::enums::marketplace_type::AmazonRegion;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_seller_connection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub marketplace_id: String,
    pub region: String,
    pub sp_refresh_token: String,
    pub ads_refresh_token: Option<String>,
    pub ads_profile_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deactivated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SellerConnection {
    fn from(m: Model) -> Self {
        SellerConnection {
            id: m.id,
            account_id: m.account_id,
            asp_id: m.asp_id,
            marketplace_id: m.marketplace_id,
            region: AmazonRegion::from_code(&m.region).unwrap_or(AmazonRegion::Na),
            sp_refresh_token: m.sp_refresh_token,
            ads_refresh_token: m.ads_refresh_token,
            ads_profile_id: m.ads_profile_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deactivated_at: m.deactivated_at,
        }
    }
}

pub async fn find(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: &str,
    marketplace_id: &str,
) -> Result<Option<SellerConnection>> {
    let model = Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .filter(Column::AspId.eq(asp_id))
        .filter(Column::MarketplaceId.eq(marketplace_id))
        .one(db)
        .await?;
    Ok(model.map(Into::into))
}

/// Active connections of an account, optionally narrowed to one seller
pub async fn list_active(
    db: &DatabaseConnection,
    account_id: &str,
    asp_id: Option<&str>,
) -> Result<Vec<SellerConnection>> {
    let mut query = Entity::find()
        .filter(Column::AccountId.eq(account_id))
        .filter(Column::DeactivatedAt.is_null());
    if let Some(asp_id) = asp_id {
        query = query.filter(Column::AspId.eq(asp_id));
    }
    let models = query.order_by_asc(Column::CreatedAt).all(db).await?;
    Ok(models.into_iter().map(Into::into).collect())
}

/// Insert, or refresh the token of the existing row with the same
/// `(account_id, asp_id, marketplace_id)`. Returns the stored row.
pub async fn upsert(
    db: &DatabaseConnection,
    connection: &SellerConnection,
) -> Result<SellerConnection> {
    let existing = find(
        db,
        &connection.account_id,
        &connection.asp_id,
        &connection.marketplace_id,
    )
    .await?;

    let model = if let Some(existing) = existing {
        let active = ActiveModel {
            id: Set(existing.id.clone()),
            region: Set(connection.region.code().to_string()),
            sp_refresh_token: Set(connection.sp_refresh_token.clone()),
            updated_at: Set(Utc::now()),
            deactivated_at: Set(None),
            ..Default::default()
        };
        active.update(db).await?
    } else {
        let active = ActiveModel {
            id: Set(connection.id.clone()),
            account_id: Set(connection.account_id.clone()),
            asp_id: Set(connection.asp_id.clone()),
            marketplace_id: Set(connection.marketplace_id.clone()),
            region: Set(connection.region.code().to_string()),
            sp_refresh_token: Set(connection.sp_refresh_token.clone()),
            ads_refresh_token: Set(connection.ads_refresh_token.clone()),
            ads_profile_id: Set(connection.ads_profile_id.clone()),
            created_at: Set(connection.created_at),
            updated_at: Set(connection.updated_at),
            deactivated_at: Set(None),
        };
        active.insert(db).await?
    };
    Ok(model.into())
}

pub async fn set_ads_credentials(
    db: &DatabaseConnection,
    id: &str,
    ads_refresh_token: Option<String>,
    ads_profile_id: Option<String>,
) -> Result<()> {
    let mut active = ActiveModel {
        id: Set(id.to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    if let Some(token) = ads_refresh_token {
        active.ads_refresh_token = Set(Some(token));
    }
    if let Some(profile_id) = ads_profile_id {
        active.ads_profile_id = Set(Some(profile_id));
    }
    active.update(db).await?;
    Ok(())
}
